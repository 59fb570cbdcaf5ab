//! Error types for presentation conversion.
//!
//! Only structural failures live here. Element-level anomalies (a missing
//! image, an absent transform, an unresolvable colour) are recovered where
//! they occur and never become an `Error`.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can abort a conversion.
#[derive(Error, Debug)]
pub enum Error {
    /// The input bytes are not a valid compressed package.
    #[error("Invalid presentation package: {0}")]
    ContainerError(String),

    /// A slide part could not be parsed as XML.
    #[error("XML parsing error: {0}")]
    XmlError(String),

    /// The package was readable but contained no slides.
    #[error("No slides found in presentation")]
    EmptyPresentation,

    /// The paginator failed to assemble the output document.
    #[error("Render error: {0}")]
    RenderError(String),
}
