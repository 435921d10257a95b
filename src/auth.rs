//! Token resolution for YouTrack requests.
//!
//! Explicit configuration (CLI, config file or `YTK_TOKEN`) wins, then
//! `YOUTRACK_TOKEN`. Empty values are ignored.

use ytk::GlobalArgs;
use ytk::environment;

/// Fallback variable holding a YouTrack permanent token.
pub const TOKEN_ENV: &str = "YOUTRACK_TOKEN";

pub fn resolve_token(global: &GlobalArgs) -> String {
    global
        .token
        .as_deref()
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
        .or_else(|| environment::non_empty_var(TOKEN_ENV))
        .unwrap_or_default()
}
