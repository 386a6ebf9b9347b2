//! The element contract between the prompt client and whatever renders it.

/// Button that starts a generation.
pub const GENERATE_BUTTON: &str = "generateBtn";
/// Text input holding the prompt.
pub const PROMPT_INPUT: &str = "prompt";
/// Label showing progress and errors.
pub const STATUS_LABEL: &str = "status";
/// Button that fetches the generated artifact. Hidden until a target exists.
pub const DOWNLOAD_BUTTON: &str = "downloadBtn";

/// Elements a page must expose before a client can attach to it.
pub const REQUIRED_ELEMENTS: [&str; 4] = [GENERATE_BUTTON, PROMPT_INPUT, STATUS_LABEL, DOWNLOAD_BUTTON];

/// A surface the prompt client reads input from and reports state to.
///
/// Methods take `&self` because submissions run as independent tasks that
/// share one page; implementations keep their state behind a lock.
pub trait Page: Send + Sync {
    /// Whether the page has an element with the given identifier.
    fn has_element(&self, id: &str) -> bool;

    /// Current contents of the prompt input.
    fn prompt_text(&self) -> String;

    /// Replace the status label text.
    fn set_status(&self, text: &str);

    /// Show or hide the download button.
    fn set_download_visible(&self, visible: bool);

    /// Send the user to `url`. Irreversible from the client's point of view.
    fn navigate(&self, url: &str);
}

/// First required element the page lacks, if any.
pub fn missing_element<P: Page + ?Sized>(page: &P) -> Option<&'static str> {
    REQUIRED_ELEMENTS
        .iter()
        .copied()
        .find(|id| !page.has_element(id))
}
