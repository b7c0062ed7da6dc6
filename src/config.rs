use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::errors::JoblyError;

/// Contents of the `.joblyrc` file. Command line flags take precedence.
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    pub port: Option<u16>,
    pub database: Option<String>,
    pub secret: Option<String>,
}

impl Config {
    pub fn parse(content: &str) -> Result<Self, JoblyError> {
        toml::from_str(content).map_err(|err| JoblyError::ParseConfigFile { source: err })
    }

    /// Reads the config at `path`; a missing file means defaults.
    pub fn load(path: &str) -> Result<Self, JoblyError> {
        if !Path::new(path).exists() {
            debug!("No config file at {}, using defaults", path);
            return Ok(Config::default());
        }

        let content =
            fs::read_to_string(path).map_err(|err| JoblyError::ReadConfigFile { source: err })?;

        Config::parse(&content)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_all_keys() {
        let config = Config::parse(
            r#"
            port = 3001
            database = "~/.jobly"
            secret = "shh"
            "#,
        )
        .unwrap();

        assert_eq!(
            config,
            Config {
                port: Some(3001),
                database: Some("~/.jobly".to_owned()),
                secret: Some("shh".to_owned()),
            }
        );
    }

    #[test]
    fn keys_are_optional() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn rejects_invalid_toml() {
        let result = Config::parse("port = \"many\"");
        assert!(matches!(result, Err(JoblyError::ParseConfigFile { .. })));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let config = Config::load("./does-not-exist/.joblyrc").unwrap();
        assert_eq!(config, Config::default());
    }
}
