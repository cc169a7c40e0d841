use crate::store::{Credentials, DEFAULT_DOMAIN, Endpoint, Region, SignError, Store, tools};
use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};
use std::{collections::BTreeMap, env, fs::File, path::Path};

/// Host used when none is given and the config file has no entry for it
pub const DEFAULT_HOST: &str = "default";

pub const ENV_ACCOUNT_ID: &str = "PASTESIGN_ACCOUNT_ID";
pub const ENV_BUCKET: &str = "PASTESIGN_BUCKET";
pub const ENV_ACCESS_KEY_ID: &str = "PASTESIGN_ACCESS_KEY_ID";
pub const ENV_SECRET_ACCESS_KEY: &str = "PASTESIGN_SECRET_ACCESS_KEY";
pub const ENV_REGION: &str = "PASTESIGN_REGION";
pub const ENV_PASSCODE: &str = "PASTESIGN_PASSCODE";

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub hosts: BTreeMap<String, Host>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Host {
    pub account_id: Option<String>,
    pub bucket: Option<String>,
    pub access_key: Option<String>,
    #[serde(default, deserialize_with = "secret")]
    pub secret_key: Option<SecretString>,
    pub region: Option<String>,
    pub domain: Option<String>,
    pub endpoint: Option<String>,
    #[serde(default, deserialize_with = "secret")]
    pub passcode: Option<SecretString>,
}

fn secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.map(|s| SecretString::new(s.into_boxed_str())))
}

impl Config {
    /// # Errors
    ///
    /// Will return `Err` if the file can not be opened or parsed
    pub fn new(config_path: &Path) -> Result<Self> {
        let file = File::open(config_path)
            .with_context(|| format!("unable to open {}", config_path.display()))?;

        let config: Self =
            serde_yaml_ng::from_reader(file).context("unable to parse config file")?;

        Ok(config)
    }

    /// Load the config file if it exists, an empty config otherwise
    ///
    /// # Errors
    ///
    /// Will return `Err` if the file exists but can not be parsed
    pub fn load(config_path: &Path) -> Result<Self> {
        if config_path.is_file() {
            Self::new(config_path)
        } else {
            log::info!(
                "config file {} not found, using environment only",
                config_path.display()
            );
            Ok(Self::default())
        }
    }

    /// Take the host out of the config and apply environment overrides.
    /// The default host may come from the environment alone.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the host is not defined
    pub fn take_host(&mut self, name: &str) -> Result<Host> {
        let host = match self.hosts.remove(name) {
            Some(host) => host,
            None if name == DEFAULT_HOST => Host::default(),
            None => anyhow::bail!("could not find host {name}"),
        };

        Ok(host.with_env())
    }
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty())
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Host {
    /// Environment variables take precedence over the file
    #[must_use]
    pub fn with_env(mut self) -> Self {
        if let Some(v) = env_var(ENV_ACCOUNT_ID) {
            self.account_id = Some(v);
        }
        if let Some(v) = env_var(ENV_BUCKET) {
            self.bucket = Some(v);
        }
        if let Some(v) = env_var(ENV_ACCESS_KEY_ID) {
            self.access_key = Some(v);
        }
        if let Some(v) = env_var(ENV_SECRET_ACCESS_KEY) {
            self.secret_key = Some(SecretString::new(v.into_boxed_str()));
        }
        if let Some(v) = env_var(ENV_REGION) {
            self.region = Some(v);
        }
        if let Some(v) = env_var(ENV_PASSCODE) {
            self.passcode = Some(SecretString::new(v.into_boxed_str()));
        }
        self
    }

    fn secret_key(&self) -> Option<&str> {
        self.secret_key
            .as_ref()
            .map(|s| s.expose_secret())
            .filter(|s| !s.is_empty())
    }

    /// Presence of every required value, by configuration name. The
    /// account id is not needed when an explicit endpoint is set.
    #[must_use]
    pub fn configured(&self) -> BTreeMap<&'static str, bool> {
        BTreeMap::from([
            (
                "account_id",
                non_empty(self.account_id.as_ref()).is_some() || self.endpoint.is_some(),
            ),
            ("bucket", non_empty(self.bucket.as_ref()).is_some()),
            ("access_key", non_empty(self.access_key.as_ref()).is_some()),
            ("secret_key", self.secret_key().is_some()),
        ])
    }

    #[must_use]
    pub fn masked_account_id(&self) -> Option<String> {
        non_empty(self.account_id.as_ref()).map(tools::mask)
    }

    #[must_use]
    pub fn passcode(&self) -> Option<&SecretString> {
        self.passcode
            .as_ref()
            .filter(|p| !p.expose_secret().is_empty())
    }

    /// # Errors
    ///
    /// Will return `Err` if the region is not valid
    pub fn region(&self) -> Result<Region, SignError> {
        non_empty(self.region.as_ref()).map_or_else(
            || Ok(Region::default()),
            |r| {
                r.parse::<Region>()
                    .map_err(|e| SignError::InvalidConfig {
                        name: "region",
                        reason: e.to_string(),
                    })
            },
        )
    }

    /// Resolve the host into a [`Store`]. Called for every signature so a
    /// missing value fails that call only, naming every absent setting.
    ///
    /// # Errors
    ///
    /// Will return `Err` if a required value is missing or invalid
    pub fn store(&self) -> Result<Store, SignError> {
        let missing: Vec<&'static str> = self
            .configured()
            .into_iter()
            .filter_map(|(name, present)| (!present).then_some(name))
            .collect();

        if !missing.is_empty() {
            return Err(SignError::Config { missing });
        }

        let (Some(bucket), Some(access_key), Some(secret_key)) = (
            non_empty(self.bucket.as_ref()),
            non_empty(self.access_key.as_ref()),
            self.secret_key(),
        ) else {
            return Err(SignError::Config {
                missing: vec!["bucket", "access_key", "secret_key"],
            });
        };

        let endpoint = match (&self.endpoint, non_empty(self.account_id.as_ref())) {
            (Some(endpoint), _) => Endpoint::parse(endpoint)?,
            (None, Some(account_id)) => Endpoint::account(
                account_id,
                non_empty(self.domain.as_ref()).unwrap_or(DEFAULT_DOMAIN),
            ),
            (None, None) => {
                return Err(SignError::Config {
                    missing: vec!["account_id"],
                });
            }
        };

        let credentials = Credentials::new(access_key, &SecretString::new(secret_key.into()));

        Ok(Store::new(&credentials, &self.region()?, &bucket, endpoint))
    }
}
