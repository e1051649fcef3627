/// Error types shared by the background coordinator and the popup
use thiserror::Error;

/// Why a summary could not be produced.
///
/// Cloneable so a single failed job can be reported to every caller waiting on it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SummarizeError {
    #[error("AI Summarizer API not available. Please use Chrome 138+ with AI features enabled.")]
    ApiNotPresent,

    #[error("AI Summarizer is not available on this device.")]
    Unavailable,

    #[error("AI model needs to be downloaded. Please wait and try again in a few minutes.")]
    ModelDownloading,

    #[error("Not enough content to summarize on this page.")]
    InsufficientContent,

    #[error("{0}")]
    HostCall(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("Failed to access session storage: {0}")]
    Access(String),

    #[error("Failed to (de)serialize stored summary: {0}")]
    Serialization(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("Failed to send message: {0}")]
    Send(String),

    #[error("No response from background")]
    NoResponse,

    #[error("Unexpected response: {0}")]
    Decode(String),
}

/// Everything the popup can end up showing in its error region
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PopupError {
    #[error(transparent)]
    Summarize(#[from] SummarizeError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Could not find the active tab.")]
    NoActiveTab,

    #[error("This page cannot be summarized.")]
    RestrictedPage,

    #[error("Failed to read page content: {0}")]
    Extraction(String),

    #[error("{0}")]
    Remote(String),
}
