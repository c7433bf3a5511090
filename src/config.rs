//! Connection settings resolved from layered sources.
//!
//! Layers are consulted in order (CLI overrides, environment, INI file,
//! built-in defaults) and the first non-empty value for a key wins.

use std::collections::HashMap;
use std::env;
use std::path::Path;

use ini::{Ini, ParseOption};
use jira_api::config::DEFAULT_API_VERSION;
use jira_api::JiraConfig;

use crate::error::ExportError;

const INI_SECTION: &str = "jira";

/// Values are taken literally: tokens may contain backslashes or quotes.
fn literal_values() -> ParseOption {
    ParseOption {
        enabled_quote: false,
        enabled_escape: false,
        ..ParseOption::default()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SettingKey {
    BaseUrl,
    Email,
    ApiToken,
    WorklogUser,
    ApiVersion,
}

impl SettingKey {
    pub const ALL: [SettingKey; 5] = [
        SettingKey::BaseUrl,
        SettingKey::Email,
        SettingKey::ApiToken,
        SettingKey::WorklogUser,
        SettingKey::ApiVersion,
    ];

    pub fn env_var(&self) -> &'static str {
        match self {
            SettingKey::BaseUrl => "JIRA_BASE_URL",
            SettingKey::Email => "JIRA_EMAIL",
            SettingKey::ApiToken => "JIRA_API_TOKEN",
            SettingKey::WorklogUser => "JIRA_WORKLOG_USER",
            SettingKey::ApiVersion => "JIRA_API_VERSION",
        }
    }

    pub fn ini_key(&self) -> &'static str {
        match self {
            SettingKey::BaseUrl => "base_url",
            SettingKey::Email => "email",
            SettingKey::ApiToken => "api_token",
            SettingKey::WorklogUser => "worklog_user",
            SettingKey::ApiVersion => "api_version",
        }
    }

    fn from_ini_key(key: &str) -> Option<SettingKey> {
        let key = key.trim();
        SettingKey::ALL
            .into_iter()
            .find(|candidate| candidate.ini_key().eq_ignore_ascii_case(key))
    }
}

/// One named source of setting values.
#[derive(Clone, Debug)]
pub struct SettingsLayer {
    name: &'static str,
    values: HashMap<SettingKey, String>,
}

impl SettingsLayer {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            values: HashMap::new(),
        }
    }

    pub fn with(mut self, key: SettingKey, value: impl Into<String>) -> Self {
        self.values.insert(key, value.into());
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Command-line overrides. Only the worklog user can be overridden from flags.
    pub fn from_cli(user: Option<&str>) -> Self {
        let mut layer = Self::new("command line");
        if let Some(user) = user {
            layer.values.insert(SettingKey::WorklogUser, user.to_string());
        }
        layer
    }

    /// Builds the environment layer from `(name, value)` pairs, keeping only `JIRA_*` keys we know.
    pub fn from_env_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut layer = Self::new("environment");
        for (name, value) in pairs {
            if let Some(key) = SettingKey::ALL
                .into_iter()
                .find(|key| key.env_var() == name.as_ref())
            {
                layer.values.insert(key, value.into());
            }
        }
        layer
    }

    pub fn from_process_env() -> Self {
        Self::from_env_pairs(
            SettingKey::ALL
                .into_iter()
                .filter_map(|key| env::var(key.env_var()).ok().map(|value| (key.env_var(), value))),
        )
    }

    /// Reads the `[jira]` section of an INI file.
    pub fn from_ini_file(path: &Path) -> Result<Self, ExportError> {
        if !path.is_file() {
            return Err(ExportError::Configuration(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        let ini = Ini::load_from_file_opt(path, literal_values()).map_err(|err| {
            ExportError::Configuration(format!("Cannot read {}: {}", path.display(), err))
        })?;
        Self::from_ini(&ini)
    }

    pub fn from_ini_str(content: &str) -> Result<Self, ExportError> {
        let ini = Ini::load_from_str_opt(content, literal_values())
            .map_err(|err| ExportError::Configuration(format!("Cannot parse config: {}", err)))?;
        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> Result<Self, ExportError> {
        let section = ini.section(Some(INI_SECTION)).ok_or_else(|| {
            ExportError::Configuration(format!("Config file missing [{}] section", INI_SECTION))
        })?;
        let mut layer = Self::new("config file");
        for (name, value) in section.iter() {
            if let Some(key) = SettingKey::from_ini_key(name) {
                layer.values.insert(key, value.to_string());
            }
        }
        Ok(layer)
    }

    pub fn defaults() -> Self {
        Self::new("defaults").with(SettingKey::ApiVersion, DEFAULT_API_VERSION)
    }

    fn get(&self, key: SettingKey) -> Option<&str> {
        self.values
            .get(&key)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }
}

/// Ordered stack of layers; earlier layers take precedence.
#[derive(Clone, Debug, Default)]
pub struct LayeredSettings {
    layers: Vec<SettingsLayer>,
}

impl LayeredSettings {
    pub fn new(layers: Vec<SettingsLayer>) -> Self {
        Self { layers }
    }

    /// Returns the first non-empty value for `key` with the name of the layer that supplied it.
    pub fn lookup(&self, key: SettingKey) -> Option<(&str, &'static str)> {
        self.layers
            .iter()
            .find_map(|layer| layer.get(key).map(|value| (value, layer.name())))
    }

    fn require(&self, key: SettingKey) -> Result<String, ExportError> {
        self.lookup(key)
            .map(|(value, _)| value.to_string())
            .ok_or_else(|| {
                ExportError::Configuration(format!(
                    "Missing {} or {} in config",
                    key.env_var(),
                    key.ini_key()
                ))
            })
    }

    pub fn resolve(&self) -> Result<ConnectionSettings, ExportError> {
        let base_url = self.require(SettingKey::BaseUrl)?;
        let email = self.require(SettingKey::Email)?;
        let api_token = self.require(SettingKey::ApiToken)?;
        let worklog_user = match self.lookup(SettingKey::WorklogUser) {
            Some((value, _)) => value.to_string(),
            None => email.clone(),
        };
        let api_version = self.require(SettingKey::ApiVersion)?;

        for key in SettingKey::ALL {
            if let Some((_, source)) = self.lookup(key) {
                log::debug!("{} taken from {}", key.ini_key(), source);
            }
        }

        Ok(ConnectionSettings {
            base_url: base_url.trim_end_matches('/').to_string(),
            email,
            api_token,
            worklog_user,
            api_version,
        })
    }
}

/// Fully resolved connection and identity settings for one export run.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    pub base_url: String,
    pub email: String,
    pub api_token: String,
    pub worklog_user: String,
    pub api_version: String,
}

impl ConnectionSettings {
    /// Resolves settings with precedence: `--user` flag, environment, INI file, defaults.
    pub fn load(config_path: Option<&Path>, user_override: Option<&str>) -> Result<Self, ExportError> {
        let mut layers = vec![
            SettingsLayer::from_cli(user_override),
            SettingsLayer::from_process_env(),
        ];
        if let Some(path) = config_path {
            layers.push(SettingsLayer::from_ini_file(path)?);
        }
        layers.push(SettingsLayer::defaults());
        LayeredSettings::new(layers).resolve()
    }

    pub fn jira_config(&self) -> JiraConfig {
        JiraConfig::new(&self.base_url, &self.email, &self.api_token)
            .with_api_version(&self.api_version)
    }
}

impl std::fmt::Debug for ConnectionSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionSettings")
            .field("base_url", &self.base_url)
            .field("email", &self.email)
            .field("api_token", &"<redacted>")
            .field("worklog_user", &self.worklog_user)
            .field("api_version", &self.api_version)
            .finish()
    }
}
