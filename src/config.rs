use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use crate::domain::IsoMonth;
use crate::error::GpadError;

pub const DEFAULT_BASE_URL: &str = "https://digital.nhs.uk/data-and-information/publications/statistical/appointments-in-general-practice";
pub const DEFAULT_CONFIG_FILE: &str = "gpad-suppliers.json";
pub const DEFAULT_OUTPUT_FILE: &str = "data/gp_suppliers.csv";
pub const DEFAULT_TMP_DIR: &str = "tmp";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub output: Option<Utf8PathBuf>,
    #[serde(default)]
    pub tmp_dir: Option<Utf8PathBuf>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub check_header: Option<bool>,
    #[serde(default)]
    pub keep_tmp: Option<bool>,
}

/// Fully resolved run settings, passed explicitly to every stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_url: String,
    pub output: Utf8PathBuf,
    pub tmp_dir: Utf8PathBuf,
    pub timeout_secs: u64,
    pub check_header: bool,
    pub keep_tmp: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            output: Utf8PathBuf::from(DEFAULT_OUTPUT_FILE),
            tmp_dir: Utf8PathBuf::from(DEFAULT_TMP_DIR),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            check_header: false,
            keep_tmp: false,
        }
    }
}

impl Settings {
    pub fn archive_path(&self, month: &IsoMonth) -> Utf8PathBuf {
        self.tmp_dir.join(format!("{month}.zip"))
    }

    pub fn extract_dir(&self, month: &IsoMonth) -> Utf8PathBuf {
        self.tmp_dir.join(month.to_string())
    }
}

/// Values given on the command line; these win over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub output: Option<Utf8PathBuf>,
    pub tmp_dir: Option<Utf8PathBuf>,
    pub check_header: bool,
    pub keep_tmp: bool,
}

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn resolve(path: Option<&Utf8Path>) -> Result<Settings, GpadError> {
        let config_path = match path {
            Some(path) => path.to_path_buf(),
            None => Utf8PathBuf::from(DEFAULT_CONFIG_FILE),
        };

        if path.is_none() && !config_path.as_std_path().exists() {
            return Ok(Self::resolve_config(Config::default()));
        }

        let content = fs::read_to_string(config_path.as_std_path())
            .map_err(|_| GpadError::ConfigRead(config_path.clone()))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|err| GpadError::ConfigParse(err.to_string()))?;

        Ok(Self::resolve_config(config))
    }

    pub fn resolve_config(config: Config) -> Settings {
        let defaults = Settings::default();
        Settings {
            base_url: config
                .base_url
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            output: config.output.unwrap_or(defaults.output),
            tmp_dir: config.tmp_dir.unwrap_or(defaults.tmp_dir),
            timeout_secs: config.timeout_secs.unwrap_or(defaults.timeout_secs),
            check_header: config.check_header.unwrap_or(defaults.check_header),
            keep_tmp: config.keep_tmp.unwrap_or(defaults.keep_tmp),
        }
    }

    pub fn apply_overrides(mut settings: Settings, overrides: Overrides) -> Settings {
        if let Some(output) = overrides.output {
            settings.output = output;
        }
        if let Some(tmp_dir) = overrides.tmp_dir {
            settings.tmp_dir = tmp_dir;
        }
        settings.check_header |= overrides.check_header;
        settings.keep_tmp |= overrides.keep_tmp;
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let settings = ConfigLoader::resolve_config(Config::default());
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.output, Utf8PathBuf::from("data/gp_suppliers.csv"));
    }

    #[test]
    fn temporary_layout_is_month_named() {
        let settings = Settings::default();
        let month: IsoMonth = "2025-10".parse().unwrap();
        assert_eq!(settings.archive_path(&month), Utf8PathBuf::from("tmp/2025-10.zip"));
        assert_eq!(settings.extract_dir(&month), Utf8PathBuf::from("tmp/2025-10"));
    }
}
