use serde::{Deserialize, Serialize};
use std::fmt;

/// Same-site policy attached to a cookie.
///
/// Stored as `"Default"`, `"Lax"`, `"Strict"` or `"None"`. Lower-case
/// spellings are accepted when reading; anything unrecognised is `Default`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SameSitePolicy {
    #[default]
    Default,
    Lax,
    Strict,
    None,
}

impl SameSitePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSitePolicy::Default => "Default",
            SameSitePolicy::Lax => "Lax",
            SameSitePolicy::Strict => "Strict",
            SameSitePolicy::None => "None",
        }
    }

    pub fn is_default(&self) -> bool {
        *self == SameSitePolicy::Default
    }
}

impl From<&str> for SameSitePolicy {
    fn from(s: &str) -> Self {
        match s {
            "Lax" | "lax" => SameSitePolicy::Lax,
            "Strict" | "strict" => SameSitePolicy::Strict,
            "None" | "none" => SameSitePolicy::None,
            _ => SameSitePolicy::Default,
        }
    }
}

impl From<String> for SameSitePolicy {
    fn from(s: String) -> Self {
        SameSitePolicy::from(s.as_str())
    }
}

impl From<SameSitePolicy> for String {
    fn from(policy: SameSitePolicy) -> Self {
        policy.as_str().to_string()
    }
}

impl fmt::Display for SameSitePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One persisted HTTP cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookieRecord {
    pub name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub domain: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub path: String,
    /// Absolute expiry in unix seconds. `0` marks a session cookie.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub expiry: i64,
    #[serde(default, skip_serializing_if = "is_false")]
    pub secure: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub http_only: bool,
    #[serde(default, skip_serializing_if = "SameSitePolicy::is_default")]
    pub same_site: SameSitePolicy,
}

impl CookieRecord {
    /// Expiry as unix seconds, or `None` for a session cookie.
    pub fn expires_at(&self) -> Option<i64> {
        (self.expiry > 0).then_some(self.expiry)
    }
}

/// The on-disk session document: every cookie the jar held for one URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieDocument {
    #[serde(default)]
    pub cookies: Vec<CookieRecord>,
}

impl CookieDocument {
    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }
}

fn is_zero(n: &i64) -> bool {
    *n == 0
}

fn is_false(b: &bool) -> bool {
    !*b
}
