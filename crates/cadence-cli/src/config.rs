use cadence_core::models::MaterializationConfig;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

pub const CONFIG_FILE: &str = "cadence.toml";
pub const ENV_PREFIX: &str = "CADENCE_";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// SQLite database file, created on first use
    pub database_path: PathBuf,
    /// Identity the CLI acts as
    pub user_id: Uuid,
    /// Listen address of `cadence serve`
    pub bind: String,
    pub materialization: MaterializationConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("cadence.db"),
            user_id: Uuid::nil(),
            bind: "127.0.0.1:8080".to_string(),
            materialization: MaterializationConfig::default(),
        }
    }
}

impl Config {
    pub fn new() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    /// Defaults, then `cadence.toml`, then `CADENCE_*` variables; nested keys
    /// use a double underscore (`CADENCE_MATERIALIZATION__HORIZON_DAYS`).
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_defaults_without_sources() {
        Jail::expect_with(|_jail| {
            let config = Config::new()?;
            assert_eq!(config, Config::default());
            Ok(())
        });
    }

    #[test]
    fn test_file_and_env_layering() {
        Jail::expect_with(|jail| {
            jail.create_file(
                CONFIG_FILE,
                r#"
                database_path = "from-file.db"
                bind = "0.0.0.0:9000"

                [materialization]
                horizon_days = 30
                "#,
            )?;
            jail.set_env("CADENCE_DATABASE_PATH", "from-env.db");
            jail.set_env("CADENCE_USER_ID", "0191f6a0-0000-7000-8000-000000000001");
            jail.set_env("CADENCE_MATERIALIZATION__RETRY__MAX_ATTEMPTS", "7");

            let config = Config::new()?;
            assert_eq!(config.database_path, PathBuf::from("from-env.db"));
            assert_eq!(config.bind, "0.0.0.0:9000");
            assert_eq!(config.user_id.to_string(), "0191f6a0-0000-7000-8000-000000000001");
            assert_eq!(config.materialization.horizon_days, 30);
            assert_eq!(config.materialization.retry.max_attempts, 7);
            assert_eq!(config.materialization.max_occurrences_per_request, 1000);
            Ok(())
        });
    }
}
