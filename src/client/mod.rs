//! Client module for promptgen.
//!
//! The client:
//! - Drives a page (terminal UI or console) through the `Page` contract
//! - Submits prompts to the generation service over HTTP
//! - Remembers the resolved download target for the download action

pub mod console;
pub mod health;
#[cfg(test)]
pub(crate) mod mock_service;
pub mod page;
pub mod session;
pub mod tui;

pub use console::ConsolePage;
pub use health::check_health;
pub use session::{Phase, PromptClient};
pub use tui::{run_tui, TerminalPage};

use crate::config::ServiceConfig;
use crate::error::ClientError;
use reqwest::Client;
use std::sync::{Mutex, MutexGuard};

/// Build the HTTP client used for every call to the service.
pub fn build_http(service: &ServiceConfig) -> Result<Client, ClientError> {
    Client::builder()
        .timeout(service.timeout())
        .build()
        .map_err(ClientError::from)
}

/// Lock a mutex, recovering the data if a holder panicked.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
