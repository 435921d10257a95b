//! Command-line argument structures.
//!
//! Isolates clap derivations so `main.rs` stays focused on runtime logic.

use clap::Parser;
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

/// Global options that apply to every sub-command.
#[derive(Parser, Deserialize, Serialize, Default, Debug, Clone, PartialEq, Eq)]
pub struct GlobalArgs {
    /// YouTrack REST API root, e.g. `https://example.youtrack.cloud/api`
    #[arg(long, value_name = "URL")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// YouTrack permanent token for authenticated API requests
    #[arg(long, value_name = "TOKEN")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Write HTTP transcript to this file for debugging
    #[arg(long)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<std::path::PathBuf>,
    /// HTTP request timeout in seconds
    #[arg(long, value_name = "SECS")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_timeout: Option<u64>,
}

impl GlobalArgs {
    /// Merge another instance into `self`, keeping values from `other`
    /// whenever it sets them.
    ///
    /// CLI flags have higher priority than configuration sources.
    pub fn merge(&mut self, other: Self) {
        self.base_url = other.base_url.or_else(|| self.base_url.take());
        self.token = other.token.or_else(|| self.token.take());
        self.transcript = other.transcript.or_else(|| self.transcript.take());
        self.http_timeout = other.http_timeout.or_else(|| self.http_timeout.take());
    }
}

/// Parameters accepted by the `issues` sub-command.
#[derive(Parser, Deserialize, Serialize, Debug, OrthoConfig, Clone, Default)]
#[command(name = "issues")]
#[ortho_config(prefix = "YTK")]
pub struct IssuesArgs {
    /// YouTrack search query, e.g. `project: DEMO #Unresolved`
    #[arg(required = true)]
    // Clap marks the argument as required so parsing yields `Some(value)`. The
    // `Option` lets configuration supply a default query.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// Custom fields to print for each issue; all decoded fields when empty
    #[arg(short = 'f', long = "field", value_name = "NAME")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
}

/// Parameters accepted by the `history` sub-command.
#[derive(Parser, Deserialize, Serialize, Debug, OrthoConfig, Clone, Default)]
#[command(name = "history")]
#[ortho_config(prefix = "YTK")]
pub struct HistoryArgs {
    /// Issue id (`DEMO-12`) or issue URL
    #[arg(required = true)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue: Option<String>,
}

/// Parameters accepted by the `create` sub-command.
#[derive(Parser, Deserialize, Serialize, Debug, OrthoConfig, Clone, Default)]
#[command(name = "create")]
#[ortho_config(prefix = "YTK")]
pub struct CreateArgs {
    /// Database id of the target project, e.g. `0-1`
    #[arg(long)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    /// Issue summary
    #[arg(long, required = true)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Issue description
    #[arg(long)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Parameters accepted by the `attach` sub-command.
#[derive(Parser, Deserialize, Serialize, Debug, OrthoConfig, Clone, Default)]
#[command(name = "attach")]
#[ortho_config(prefix = "YTK")]
pub struct AttachArgs {
    /// Issue id or URL to attach the file to
    #[arg(required = true)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue: Option<String>,
    /// File to upload
    #[arg(required = true)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<std::path::PathBuf>,
    /// Media type of the file
    #[arg(long, value_name = "TYPE")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::GlobalArgs;

    #[test]
    fn merge_prefers_cli_values() {
        let mut config = GlobalArgs {
            base_url: Some("https://config.example.com/api".to_string()),
            token: Some("config-token".to_string()),
            ..GlobalArgs::default()
        };
        let cli = GlobalArgs {
            token: Some("cli-token".to_string()),
            ..GlobalArgs::default()
        };

        config.merge(cli);

        assert_eq!(config.token.as_deref(), Some("cli-token"));
        assert_eq!(
            config.base_url.as_deref(),
            Some("https://config.example.com/api")
        );
    }

    #[test]
    fn merge_keeps_config_when_cli_missing() {
        let mut config = GlobalArgs {
            http_timeout: Some(5),
            ..GlobalArgs::default()
        };

        config.merge(GlobalArgs::default());

        assert_eq!(config.http_timeout, Some(5));
    }
}
