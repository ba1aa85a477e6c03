//! Error handling for the render surface and its drawing contexts

use std::io;
use thiserror::Error;

/// Errors that can occur while driving a render surface
#[derive(Debug, Error)]
pub enum BackdropError {
    /// An I/O error occurred while talking to the terminal
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The drawing context could not be created
    #[error("Drawing context unavailable: {0}")]
    ContextUnavailable(String),

    /// The viewport has no drawable area
    #[error("Empty viewport: {width}x{height}")]
    EmptyViewport {
        /// Width in device pixels
        width: u16,
        /// Height in device pixels
        height: u16,
    },
}

/// Type alias for Results from backdrop operations
pub type Result<T> = std::result::Result<T, BackdropError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = BackdropError::ContextUnavailable("no tty".to_string());
        assert_eq!(format!("{}", error), "Drawing context unavailable: no tty");

        let error = BackdropError::EmptyViewport {
            width: 0,
            height: 24,
        };
        assert_eq!(format!("{}", error), "Empty viewport: 0x24");
    }

    #[test]
    fn test_io_conversion() {
        let io_error = io::Error::new(io::ErrorKind::BrokenPipe, "gone");
        let error: BackdropError = io_error.into();
        assert!(matches!(error, BackdropError::Io(_)));
    }
}
