use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

const DEFAULT_MAX_PASTE_SIZE: usize = 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    /// Listen address, `host:port` or `:port`.
    pub address: String,
    pub store: StoreConfig,
    /// Root holding `templates/` and `static/`.
    pub static_base: PathBuf,
    pub production: bool,
    pub address_length: usize,
    pub max_paste_size: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    Memory,
    Sqlite { connection_string: String },
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required variable {0}")]
    Missing(&'static str),
    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl StoreConfig {
    /// Read only the store settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        match non_blank(&lookup, "STORE")
            .as_deref()
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            None | Some("sqlite") => Ok(StoreConfig::Sqlite {
                connection_string: non_blank(&lookup, "CONNECTION_STRING")
                    .ok_or(ConfigError::Missing("CONNECTION_STRING"))?,
            }),
            Some("memory") => Ok(StoreConfig::Memory),
            Some(other) => Err(ConfigError::Invalid {
                key: "STORE",
                value: other.to_owned(),
                reason: "expected `sqlite` or `memory`".into(),
            }),
        }
    }
}

impl Config {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &'static str| non_blank(&lookup, key);
        let require = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let store = StoreConfig::from_lookup(&lookup)?;

        let address_length: usize = parse("ADDRESS_LENGTH", require("ADDRESS_LENGTH")?)?;
        if address_length == 0 {
            return Err(ConfigError::Invalid {
                key: "ADDRESS_LENGTH",
                value: "0".into(),
                reason: "must be positive".into(),
            });
        }

        Ok(Config {
            address: require("ADDRESS")?,
            store,
            static_base: require("STATIC_BASE")?.into(),
            production: get("PRODUCTION")
                .map(|value| parse_bool("PRODUCTION", value))
                .transpose()?
                .unwrap_or(false),
            address_length,
            max_paste_size: get("MAX_PASTE_SIZE")
                .map(|value| parse("MAX_PASTE_SIZE", value))
                .transpose()?
                .unwrap_or(DEFAULT_MAX_PASTE_SIZE),
        })
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.static_base.join("templates")
    }

    pub fn static_dir(&self) -> PathBuf {
        self.static_base.join("static")
    }

    /// The address to bind, with a bare `:port` meaning every interface.
    pub fn listen_address(&self) -> String {
        if self.address.starts_with(':') {
            format!("0.0.0.0{}", self.address)
        } else {
            self.address.clone()
        }
    }
}

fn non_blank(lookup: impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).filter(|value| !value.trim().is_empty())
}

fn parse<T>(key: &'static str, value: String) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|err: T::Err| ConfigError::Invalid {
        key,
        reason: err.to_string(),
        value,
    })
}

fn parse_bool(key: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            value,
            reason: "expected a boolean".into(),
        }),
    }
}
