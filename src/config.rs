use crate::calendar::DayOrder;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

const APP_DIR: &str = "carecal";

/// Settings read from `config.yaml` in the user's configuration directory.
/// Every field is optional; command-line options take precedence.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Config {
    /// JSON file of bookings to display
    pub(crate) bookings: Option<PathBuf>,
    /// Order each day's bookings by start time instead of as listed
    pub(crate) sort_by_start: bool,
    /// File to append log messages to; nothing is logged if unset
    pub(crate) log_file: Option<PathBuf>,
}

impl Config {
    pub(crate) fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.yaml"))
    }

    /// Reads the configuration at `path`.  A missing file is not an error and
    /// yields the defaults.
    pub(crate) fn load(path: &Path) -> Result<Config, ConfigError> {
        let src = match fs::read_to_string(path) {
            Ok(src) => src,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("no configuration at {}; using defaults", path.display());
                return Ok(Config::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_owned(),
                    source,
                })
            }
        };
        Config::from_yaml(&src).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })
    }

    pub(crate) fn from_yaml(src: &str) -> Result<Config, serde_yaml::Error> {
        if src.trim().is_empty() {
            Ok(Config::default())
        } else {
            serde_yaml::from_str(src)
        }
    }

    /// The bookings file to read: the configured one, or `bookings.json` in
    /// the user's data directory
    pub(crate) fn bookings_path(&self) -> Option<PathBuf> {
        self.bookings
            .clone()
            .or_else(|| dirs::data_dir().map(|d| d.join(APP_DIR).join("bookings.json")))
    }

    pub(crate) fn day_order(&self) -> DayOrder {
        if self.sort_by_start {
            DayOrder::ByStart
        } else {
            DayOrder::AsGiven
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to read configuration file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid configuration in {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}
