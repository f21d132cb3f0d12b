use chrono::Utc;
use std::process::Command;

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!text.is_empty()).then_some(text)
}

fn main() {
    // Packagers building from a tarball can pin the hash themselves.
    println!("cargo:rerun-if-env-changed=TOSPOTIFY_BUILD_HASH");
    let build_hash = std::env::var("TOSPOTIFY_BUILD_HASH").ok().unwrap_or_else(|| {
        match git(&["describe", "--always", "--dirty=-dirty"]) {
            Some(desc) if desc.ends_with("-dirty") => {
                format!("{desc}-{}", Utc::now().format("%Y%m%d-%H%M%S"))
            }
            Some(desc) => desc,
            None => "unknown".to_string(),
        }
    });

    println!("cargo:rustc-env=BUILD_HASH={build_hash}");

    // .git lives at the workspace root
    println!("cargo:rerun-if-changed=../../.git/HEAD");
    println!("cargo:rerun-if-changed=../../.git/index");
}
