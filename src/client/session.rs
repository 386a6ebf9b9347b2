//! Prompt submission against the generation service.
//!
//! A `PromptClient` owns its page and the most recently resolved download
//! target. Submissions are independent: a second one started while the first
//! is in flight does not cancel it, and whichever response resolves last
//! decides the final target and status.

use super::page::{missing_element, Page};
use super::{build_http, lock};
use crate::config::ServiceConfig;
use crate::error::ClientError;
use crate::protocol::{generate_url, resolve_download_url, GenerationRequest, GenerationResponse};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::sync::Mutex;
use tracing::{debug, info, warn};

/// Status text while a request is in flight.
pub const GENERATING_STATUS: &str = "Generating...";
/// Status text once a download target is available.
pub const READY_STATUS: &str = "Ready to download";

/// Where the client is in its `Idle -> Generating -> {Ready, Error}` cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Generating,
    /// Carries the absolute download target.
    Ready(String),
    Error(ClientError),
}

/// Client for the generation service, bound to one page.
pub struct PromptClient<P: Page> {
    page: P,
    http: Client,
    base_url: String,
    download_target: Mutex<Option<String>>,
    phase: Mutex<Phase>,
}

impl<P: Page> PromptClient<P> {
    /// Attach a client to `page`. Fails if the page lacks a required element.
    pub fn attach(page: P, service: &ServiceConfig) -> Result<Self, ClientError> {
        if let Some(id) = missing_element(&page) {
            return Err(ClientError::MissingElement(id));
        }

        Ok(Self {
            page,
            http: build_http(service)?,
            base_url: service.base_url.clone(),
            download_target: Mutex::new(None),
            phase: Mutex::new(Phase::Idle),
        })
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    /// HTTP client shared with the download step.
    pub fn http(&self) -> &Client {
        &self.http
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn phase(&self) -> Phase {
        lock(&self.phase).clone()
    }

    /// The absolute URL the download action would navigate to.
    pub fn download_target(&self) -> Option<String> {
        lock(&self.download_target).clone()
    }

    /// Generate-button action: submit whatever the prompt input holds.
    pub async fn generate(&self) -> Phase {
        let prompt = self.page.prompt_text();
        self.submit(&prompt).await
    }

    /// Send one generation request for `prompt`.
    ///
    /// Failures are reported through the status label and the returned
    /// phase, never as an `Err`.
    pub async fn submit(&self, prompt: &str) -> Phase {
        self.begin();
        let result = self.request(prompt).await;

        // Status label and phase always change under the phase lock
        let mut current = lock(&self.phase);
        let phase = match result {
            Ok(url) => {
                info!("Artifact ready at {}", url);
                *lock(&self.download_target) = Some(url.clone());
                self.page.set_download_visible(true);
                self.page.set_status(READY_STATUS);
                Phase::Ready(url)
            }
            Err(err) => {
                warn!("Generation failed: {}", err);
                self.page.set_status(&err.to_string());
                Phase::Error(err)
            }
        };
        *current = phase.clone();
        phase
    }

    /// Download-button action. Navigates the page to the stored target and
    /// returns it, or does nothing when there is none.
    pub fn trigger_download(&self) -> Option<String> {
        let url = self.download_target()?;
        debug!("Navigating to {}", url);
        self.page.navigate(&url);
        Some(url)
    }

    /// Re-arm before a request starts. Runs before the first await point so
    /// the old target is gone even if the new response never arrives.
    fn begin(&self) {
        let mut current = lock(&self.phase);
        self.page.set_status(GENERATING_STATUS);
        self.page.set_download_visible(false);
        *lock(&self.download_target) = None;
        *current = Phase::Generating;
    }

    async fn request(&self, prompt: &str) -> Result<String, ClientError> {
        let url = generate_url(&self.base_url);
        debug!("POST {} ({} chars)", url, prompt.len());

        let response = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .json(&GenerationRequest::new(prompt))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(ClientError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let data: GenerationResponse = response.json().await?;
        Ok(resolve_download_url(&self.base_url, &data.download_url))
    }
}
