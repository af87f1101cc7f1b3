//! Configuration loading.
//!
//! ```toml
//! root = "/home/me/notes"
//! history_format = "journal"
//!
//! [ranking]
//! priority_since = "2024-05-01T00:00:00Z"
//! priority_sources = ["inbox/"]
//! ```

use anyhow::{bail, Context, Result};
use mdcards_core::RankingPolicy;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable naming the corpus root.
pub const ROOT_ENV: &str = "MDCARDS_ROOT";
/// Config file looked up inside the corpus root.
pub const ROOT_CONFIG_FILE: &str = "mdcards.toml";

/// How histories are persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryFormat {
    #[default]
    Journal,
    Snapshot,
}

/// Contents of a config file. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub root: Option<PathBuf>,
    pub history_format: HistoryFormat,
    pub ranking: RankingPolicy,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("invalid config {}", path.display()))
    }
}

/// Resolved settings passed to every command.
#[derive(Debug, Clone)]
pub struct Settings {
    pub root: PathBuf,
    pub history_format: HistoryFormat,
    pub ranking: RankingPolicy,
}

impl Settings {
    /// Resolve settings from arguments, environment and config files.
    ///
    /// The root comes from `--root`, then `MDCARDS_ROOT`, then the config file.
    /// The config file is `--config` if given, else `<root>/mdcards.toml`,
    /// else the user config, if any of them exist.
    pub fn resolve(root_arg: Option<PathBuf>, config_arg: Option<PathBuf>) -> Result<Self> {
        let root_hint = root_arg.or_else(|| env::var_os(ROOT_ENV).map(PathBuf::from));

        let config_path = match config_arg {
            Some(path) => Some(path),
            None => default_config_path(root_hint.as_deref()),
        };
        let config = match &config_path {
            Some(path) => {
                debug!(path = %path.display(), "loading config");
                FileConfig::load(path)?
            }
            None => FileConfig::default(),
        };

        Self::from_parts(root_hint, config)
    }

    fn from_parts(root_hint: Option<PathBuf>, config: FileConfig) -> Result<Self> {
        let Some(root) = root_hint.or(config.root) else {
            bail!("no corpus root: pass --root, set {ROOT_ENV}, or set `root` in the config file");
        };
        Ok(Self {
            root,
            history_format: config.history_format,
            ranking: config.ranking,
        })
    }
}

fn default_config_path(root: Option<&Path>) -> Option<PathBuf> {
    let in_root = root.map(|root| root.join(ROOT_CONFIG_FILE));
    let user = dirs::config_dir().map(|dir| dir.join("mdcards").join("config.toml"));
    in_root.into_iter().chain(user).find(|path| path.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn parses_full_config() {
        let config: FileConfig = toml::from_str(
            r#"
            root = "/notes"
            history_format = "snapshot"

            [ranking]
            priority_since = "2024-05-01T00:00:00Z"
            priority_sources = ["inbox/"]
            "#,
        )
        .unwrap();
        assert_eq!(config.root, Some(PathBuf::from("/notes")));
        assert_eq!(config.history_format, HistoryFormat::Snapshot);
        assert_eq!(
            config.ranking.priority_since,
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(config.ranking.priority_sources, vec!["inbox/".to_string()]);
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert_eq!(config, FileConfig::default());
        assert_eq!(config.history_format, HistoryFormat::Journal);
    }

    #[test]
    fn rejects_unknown_history_format() {
        assert!(toml::from_str::<FileConfig>("history_format = \"sqlite\"").is_err());
    }

    #[test]
    fn root_argument_wins_over_config() {
        let config = FileConfig {
            root: Some(PathBuf::from("/from-config")),
            ..Default::default()
        };
        let settings = Settings::from_parts(Some(PathBuf::from("/from-arg")), config).unwrap();
        assert_eq!(settings.root, PathBuf::from("/from-arg"));
    }

    #[test]
    fn missing_root_is_an_error() {
        assert!(Settings::from_parts(None, FileConfig::default()).is_err());
    }

    #[test]
    fn config_in_root_is_loaded() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(ROOT_CONFIG_FILE),
            "history_format = \"snapshot\"\n",
        )
        .unwrap();
        let settings = Settings::resolve(Some(dir.path().to_path_buf()), None).unwrap();
        assert_eq!(settings.history_format, HistoryFormat::Snapshot);
        assert_eq!(settings.root, dir.path());
    }
}
