//! Configuration loading helpers.
//!
//! Global options are layered from a TOML file and `YTK_*` environment
//! variables beneath the command line. Sub-command options go through
//! `ortho_config`, which reads the `cmds.<name>` tables of the same file.

use std::path::PathBuf;

use figment::Figment;
use figment::providers::{Env, Format, Toml};
use ortho_config::{OrthoConfig, load_and_merge_subcommand_for};

use crate::cli_args::GlobalArgs;
use crate::environment;
use crate::error::YtError;

/// Environment variable naming an explicit configuration file.
pub const CONFIG_PATH_ENV: &str = "YTK_CONFIG_PATH";
/// Configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".ytk.toml";
const ENV_PREFIX: &str = "YTK_";

/// Locate the configuration file.
///
/// `YTK_CONFIG_PATH` wins, then `$XDG_CONFIG_HOME/ytk/config.toml`, then
/// `.ytk.toml` in the working directory.
#[must_use]
pub fn config_path() -> Option<PathBuf> {
    if let Ok(path) = environment::var(CONFIG_PATH_ENV) {
        return Some(PathBuf::from(path));
    }
    xdg::BaseDirectories::with_prefix("ytk")
        .find_config_file("config.toml")
        .or_else(|| {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            local.is_file().then_some(local)
        })
}

/// Merge configuration file and environment values beneath `cli`.
///
/// # Errors
///
/// Returns [`YtError::Config`] if a source cannot be parsed into
/// [`GlobalArgs`].
pub fn load_global(cli: GlobalArgs) -> Result<GlobalArgs, YtError> {
    let mut figment = Figment::new();
    if let Some(path) = config_path() {
        figment = figment.merge(Toml::file(path));
    }
    let mut merged: GlobalArgs = figment.merge(Env::prefixed(ENV_PREFIX)).extract()?;
    merged.merge(cli);
    Ok(merged)
}

/// Merge configured defaults for a sub-command beneath its CLI values.
///
/// # Errors
///
/// Returns [`YtError::Config`] if configuration gathering fails.
pub fn load_subcommand<T>(cli: &T) -> Result<T, YtError>
where
    T: OrthoConfig + serde::Serialize + Default + clap::CommandFactory,
{
    load_and_merge_subcommand_for::<T>(cli).map_err(Into::into)
}
