//! Configuration management for seeker using the prefer crate.

use std::fs;
use std::path::Path;

use prefer::FromValue;
use serde::{Deserialize, Serialize};

/// Default id of the on-page error area.
pub const DEFAULT_ERROR_AREA: &str = "basic_err";

/// Class and attribute names the listing templates use for table controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromValue)]
#[serde(default)]
pub struct Markup {
    /// Class on the clickable sort icon inside a header cell.
    #[prefer(default = "sortshow")]
    pub indicator_class: String,
    /// Class on the container that declares a column's sort type.
    #[prefer(default = "sortable")]
    pub sortable_class: String,
    /// Marker class on the sortable container for numeric columns.
    #[prefer(default = "integer")]
    pub integer_class: String,
    /// Attribute carrying the zero-based column index.
    #[prefer(default = "colidx")]
    pub column_attr: String,
    /// Class that hides an element.
    #[prefer(default = "hidden")]
    pub hidden_class: String,
    /// Class on the control that saves a changed row order.
    #[prefer(default = "related-save")]
    pub save_class: String,
}

impl Default for Markup {
    fn default() -> Self {
        Self {
            indicator_class: "sortshow".to_string(),
            sortable_class: "sortable".to_string(),
            integer_class: "integer".to_string(),
            column_attr: "colidx".to_string(),
            hidden_class: "hidden".to_string(),
            save_class: "related-save".to_string(),
        }
    }
}

/// Application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Element id of the error area.
    pub error_area_id: String,
    /// Markup conventions of the listing templates.
    pub markup: Markup,
    /// Endpoint that receives a saved row order.
    pub save_url: Option<String>,
    /// Request timeout in seconds.
    pub request_timeout: u64,
    /// User agent for HTTP requests.
    pub user_agent: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            error_area_id: DEFAULT_ERROR_AREA.to_string(),
            markup: Markup::default(),
            save_url: None,
            request_timeout: 30,
            user_agent: format!("seeker/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Element id of the error area.
    #[serde(default)]
    pub error_area: Option<String>,
    /// Markup overrides.
    #[serde(default)]
    pub markup: Option<Markup>,
    /// Row-order save endpoint.
    #[serde(default)]
    pub save_url: Option<String>,
    /// Request timeout in seconds.
    #[serde(default)]
    pub request_timeout: Option<u64>,
    /// User agent string.
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Config {
    /// Load configuration using prefer crate.
    /// Automatically discovers seeker config files in standard locations.
    pub async fn load() -> Self {
        match prefer::load("seeker").await {
            Ok(pref_config) => Self::from_prefer(&pref_config),
            Err(_) => {
                // No config file found, use defaults
                Self::default()
            }
        }
    }

    /// Extract the known keys from a discovered prefer config.
    pub fn from_prefer(pref_config: &prefer::Config) -> Self {
        let error_area: Option<String> = pref_config.get("error_area").ok();
        let markup: Option<Markup> = pref_config.get("markup").ok();
        let save_url: Option<String> = pref_config.get("save_url").ok();
        let request_timeout: Option<u64> = pref_config.get("request_timeout").ok();
        let user_agent: Option<String> = pref_config.get("user_agent").ok();

        Config {
            error_area,
            markup,
            save_url,
            request_timeout,
            user_agent,
        }
    }

    /// Load configuration from an explicit TOML file (`~` is expanded).
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let expanded = shellexpand::tilde(path);
        let contents = fs::read_to_string(Path::new(expanded.as_ref()))?;
        Ok(toml::from_str(&contents)?)
    }

    /// Apply configuration to settings.
    pub fn apply_to_settings(&self, settings: &mut Settings) {
        if let Some(ref error_area) = self.error_area {
            settings.error_area_id = error_area.clone();
        }
        if let Some(ref markup) = self.markup {
            settings.markup = markup.clone();
        }
        if let Some(ref url) = self.save_url {
            settings.save_url = Some(url.clone());
        }
        if let Some(timeout) = self.request_timeout {
            settings.request_timeout = timeout;
        }
        if let Some(ref user_agent) = self.user_agent {
            settings.user_agent = user_agent.clone();
        }
    }
}

/// Load settings from configuration (async version).
pub async fn load_settings() -> Settings {
    let config = Config::load().await;
    let mut settings = Settings::default();
    config.apply_to_settings(&mut settings);
    settings
}
