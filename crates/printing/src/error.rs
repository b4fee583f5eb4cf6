//! Print/render error model.

use serde::Serialize;
use thiserror::Error;

/// Mandatory packing-list field category missing at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingField {
    /// No packing list was supplied at all.
    PackingList,
    /// The packing list has no boxes.
    Boxes,
    /// Client name or address is missing.
    Client,
    /// The packing-list code is missing.
    Code,
}

impl core::fmt::Display for MissingField {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            MissingField::PackingList => "no data provided",
            MissingField::Boxes => "no boxes found",
            MissingField::Client => "missing client information",
            MissingField::Code => "missing code",
        };
        f.write_str(msg)
    }
}

/// Failure of a print surface (the isolated context a document is printed from).
#[derive(Debug, Error)]
pub enum SurfaceError {
    /// The platform refused to provide a surface (e.g. pop-ups blocked).
    #[error("print surface refused: {0}")]
    Refused(String),

    #[error("print surface io error: {0}")]
    Io(#[from] std::io::Error),

    /// The configured print command ran but reported failure.
    #[error("print command `{program}` failed with status {status}")]
    Command { program: String, status: String },
}

impl SurfaceError {
    /// Actionable hint for the person trying to print.
    pub fn guidance(&self) -> &'static str {
        match self {
            SurfaceError::Refused(_) => {
                "Allow pop-ups (or print windows) for this application and try again."
            }
            SurfaceError::Io(_) => "Check that the print spool directory exists and is writable.",
            SurfaceError::Command { .. } => {
                "Check that the configured print command is installed and a printer is available."
            }
        }
    }
}

/// Error returned by `render` and `print_document`.
///
/// All variants are terminal for the call; nothing is retried.
#[derive(Debug, Error)]
pub enum PrintError {
    #[error("invalid packing list: {0}")]
    Validation(MissingField),

    #[error("failed to encode packing-list identifier: {0}")]
    Encoding(String),

    #[error("print surface unavailable: {source}")]
    RenderSurface {
        #[source]
        source: SurfaceError,
    },
}

impl PrintError {
    pub fn guidance(&self) -> Option<&'static str> {
        match self {
            PrintError::RenderSurface { source } => Some(source.guidance()),
            _ => None,
        }
    }
}

impl From<SurfaceError> for PrintError {
    fn from(source: SurfaceError) -> Self {
        PrintError::RenderSurface { source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_names_the_missing_category() {
        let err = PrintError::Validation(MissingField::Boxes);
        assert_eq!(err.to_string(), "invalid packing list: no boxes found");
        assert!(err.guidance().is_none());
    }

    #[test]
    fn surface_errors_carry_guidance() {
        let err = PrintError::from(SurfaceError::Refused("blocked".into()));
        assert!(err.guidance().unwrap().contains("pop-ups"));
    }
}
