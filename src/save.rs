//! Saving a changed row order back to the server.
//!
//! The server answers with JSON carrying a `status` field; `ok`/`ready`
//! come with an HTML fragment, `error` with a message. The flow runs as one
//! sequence: disable controls, post the order, update the view, re-enable
//! controls. Every failure ends up in the view's error area.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info};
use url::Url;

use crate::config::Settings;
use crate::view::TableView;

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("No status returned")]
    NoStatus,

    #[error("Server reported an error: {0}")]
    Server(String),

    #[error("Unexpected status: {0}")]
    UnexpectedStatus(String),

    #[error("No save URL configured")]
    NoUrl,

    #[error("Invalid save URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Response body of the catalogue's AJAX endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AjaxResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub html: Option<String>,
    #[serde(default)]
    pub msg: Option<String>,
}

impl AjaxResponse {
    /// HTML fragment of a successful response.
    pub fn into_fragment(self) -> Result<String, SaveError> {
        match self.status.as_deref() {
            None => Err(SaveError::NoStatus),
            Some("ok") | Some("ready") => Ok(self.html.unwrap_or_default()),
            Some("error") => Err(SaveError::Server(
                self.msg
                    .unwrap_or_else(|| "An error has occurred".to_string()),
            )),
            Some(other) => Err(SaveError::UnexpectedStatus(other.to_string())),
        }
    }
}

/// Destination of a saved row order.
#[async_trait]
pub trait OrderSink: Send + Sync {
    async fn post_order(&self, row_ids: &[String]) -> Result<AjaxResponse, SaveError>;
}

/// Posts the row order as a form to the catalogue server.
pub struct HttpOrderSink {
    client: Client,
    url: Url,
}

impl HttpOrderSink {
    pub fn new(url: &str, settings: &Settings) -> Result<Self, SaveError> {
        let url = Url::parse(url)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout))
            .user_agent(settings.user_agent.clone())
            .build()?;
        Ok(Self { client, url })
    }

    /// Sink for the endpoint configured in `settings`.
    pub fn from_settings(settings: &Settings) -> Result<Self, SaveError> {
        let url = settings.save_url.as_deref().ok_or(SaveError::NoUrl)?;
        Self::new(url, settings)
    }
}

#[async_trait]
impl OrderSink for HttpOrderSink {
    async fn post_order(&self, row_ids: &[String]) -> Result<AjaxResponse, SaveError> {
        let rows = serde_json::to_string(row_ids)?;
        debug!(url = %self.url, count = row_ids.len(), "Posting row order");
        let response = self
            .client
            .post(self.url.clone())
            .form(&[("rows", rows)])
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }
}

/// Progress of a save, in the order the steps happen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveEvent {
    ControlsDisabled,
    RequestSent { rows: usize },
    Updated,
    Failed { message: String },
    ControlsEnabled,
}

/// Runs the save sequence for one view.
#[derive(Default)]
pub struct SaveFlow {
    events: Option<mpsc::UnboundedSender<SaveEvent>>,
}

impl SaveFlow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report each step on `events`.
    pub fn with_events(mut self, events: mpsc::UnboundedSender<SaveEvent>) -> Self {
        self.events = Some(events);
        self
    }

    fn emit(&self, event: SaveEvent) {
        if let Some(tx) = &self.events {
            let _ = tx.send(event);
        }
    }

    /// Save the current row order of `view` through `sink`.
    ///
    /// On success the unsaved flag is cleared and the returned fragment is
    /// kept on the view. On failure the flag stays set and the error is
    /// shown in the error area. Controls are re-enabled either way.
    pub async fn run(&self, view: &mut TableView, sink: &dyn OrderSink) -> Result<(), SaveError> {
        view.set_busy(true);
        self.emit(SaveEvent::ControlsDisabled);

        let row_ids = view.row_ids();
        self.emit(SaveEvent::RequestSent {
            rows: row_ids.len(),
        });
        let result = match sink.post_order(&row_ids).await {
            Ok(response) => response.into_fragment(),
            Err(e) => Err(e),
        };

        match &result {
            Ok(fragment) => {
                view.mark_saved(fragment.clone());
                self.emit(SaveEvent::Updated);
                info!(rows = row_ids.len(), "Saved row order");
            }
            Err(e) => {
                view.errors_mut().report("save_order", &e.to_string());
                self.emit(SaveEvent::Failed {
                    message: e.to_string(),
                });
            }
        }

        view.set_busy(false);
        self.emit(SaveEvent::ControlsEnabled);
        result.map(|_| ())
    }
}
