pub mod config;
pub mod cookie;
pub mod song;

pub use config::*;
pub use cookie::*;
pub use song::*;
