use std::path::Path;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub session: amazonmusic::Session,
}
impl Config {
    pub const FILENAME: &str = "config.toml";

    /// Loads the config at `path`. If there is none, a default config is
    /// written there for the user to fill in, and an error is returned.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse {}", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("no config file found, creating default config");
                Config::default().save(path)?;
                anyhow::bail!(
                    "No config found; wrote a default one to {}. Fill in your session details and try again.",
                    path.display()
                )
            }
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        std::fs::write(path, toml::to_string(self)?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!("saved config to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [session]
            region = "NA"
            territory = "US"
            csrf_token = "abc"
            "#,
        )
        .unwrap();

        let defaults = amazonmusic::Session::default();
        assert_eq!(config.session.region, "NA");
        assert_eq!(config.session.territory, "US");
        assert_eq!(config.session.csrf_token, "abc");
        assert_eq!(config.session.base_url, defaults.base_url);
        assert_eq!(config.session.device_type, defaults.device_type);
    }

    #[test]
    fn test_default_config_round_trips() {
        let config = Config::default();
        let parsed: Config = toml::from_str(&toml::to_string(&config).unwrap()).unwrap();
        assert_eq!(parsed, config);
    }
}
