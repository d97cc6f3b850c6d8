//! Error types for color_tracker

use thiserror::Error;

/// Failures surfaced by the tracking engine.
///
/// Per-frame pipeline steps are total over a valid frame; every variant here is
/// either a precondition violation or a failure reported by an I/O collaborator.
#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("frame has zero width or height")]
    EmptyFrame,

    #[error("no frame has been read yet")]
    NoFrame,

    #[error("pixel ({x}, {y}) is outside a {width}x{height} frame")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("collaborator error: {0}")]
    Collaborator(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl TrackerError {
    pub(crate) fn collaborator<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        TrackerError::Collaborator(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, TrackerError>;
