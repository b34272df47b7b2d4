//! Error types for the protocol layer.
//!
//! A `ProtocolError` always means "this frame is not a command". The
//! server treats every variant the same way (the frame is ignored), but
//! the variants keep the debug logs specific.

/// Errors produced while turning a frame into a [`Command`](crate::Command).
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// The frame was not valid UTF-8.
    #[error("frame is not valid UTF-8")]
    InvalidUtf8,

    /// The frame was empty or only whitespace.
    #[error("empty command")]
    Empty,

    /// The first word is not a known verb.
    #[error("unknown verb: {0}")]
    UnknownVerb(String),

    /// The verb is known but its arguments don't fit the grammar.
    #[error("invalid arguments for {verb}: {detail}")]
    InvalidArguments {
        verb: &'static str,
        detail: String,
    },
}
