use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub data_file: String,
    pub invite_base_url: String,
    pub group_base_url: String,
    pub user_name: String,
    pub user_initials: String,
    pub seed_mock_data: bool,
    pub log_level: String,
    pub watch_interval_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_file: "betmoment.redb".to_string(),
            invite_base_url: "http://localhost:8080".to_string(),
            group_base_url: "https://betmoment.app".to_string(),
            user_name: "You".to_string(),
            user_initials: "Y".to_string(),
            seed_mock_data: true,
            log_level: "info".to_string(),
            watch_interval_secs: 30,
        }
    }
}

impl Settings {
    /// Defaults, then `betmoment.toml` if present, then `BETMOMENT_*` env vars.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("betmoment")
    }

    pub fn load_from(file_stem: &str) -> Result<Self, ConfigError> {
        let defaults = Settings::default();

        Config::builder()
            .set_default("data_file", defaults.data_file)?
            .set_default("invite_base_url", defaults.invite_base_url)?
            .set_default("group_base_url", defaults.group_base_url)?
            .set_default("user_name", defaults.user_name)?
            .set_default("user_initials", defaults.user_initials)?
            .set_default("seed_mock_data", defaults.seed_mock_data)?
            .set_default("log_level", defaults.log_level)?
            .set_default("watch_interval_secs", defaults.watch_interval_secs as i64)?
            .add_source(File::with_name(file_stem).required(false))
            .add_source(Environment::with_prefix("BETMOMENT").try_parsing(true))
            .build()?
            .try_deserialize()
    }
}
