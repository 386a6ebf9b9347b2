//! Non-interactive page for `--pipe` mode.
//!
//! Status updates go to stderr so stdout carries only the result.

use super::lock;
use super::page::Page;
use std::sync::Mutex;

pub struct ConsolePage {
    prompt: String,
    navigation: Mutex<Option<String>>,
}

impl ConsolePage {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            navigation: Mutex::new(None),
        }
    }

    /// Take the URL the client navigated to, if it has not been handled yet.
    pub fn take_navigation(&self) -> Option<String> {
        lock(&self.navigation).take()
    }
}

impl Page for ConsolePage {
    fn has_element(&self, _id: &str) -> bool {
        true
    }

    fn prompt_text(&self) -> String {
        self.prompt.clone()
    }

    fn set_status(&self, text: &str) {
        eprintln!("{}", text);
    }

    fn set_download_visible(&self, _visible: bool) {}

    fn navigate(&self, url: &str) {
        *lock(&self.navigation) = Some(url.to_string());
    }
}
