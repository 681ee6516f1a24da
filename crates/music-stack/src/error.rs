//! Error types for the music stack.
//!
//! Programmer errors (unknown keys, a broken ordering invariant) are reported
//! through the same enum as backend failures so callers can decide whether to
//! abort. Silence is never an error: an element without an asset simply fades
//! the current music out.

use crate::asset::MusicId;
use crate::key::PriorityKey;
use thiserror::Error;

/// The main error type for music stack operations.
#[derive(Error, Debug)]
pub enum MusicStackError {
    /// A key was removed that is not registered in the stack.
    #[error("Key {0} is not in the music stack")]
    UnknownKey(PriorityKey),

    /// The top of the stack changed after an insert, but not to the inserted element.
    #[error("Inserted {inserted} but {top} rose to the top of the music stack")]
    OrderingViolation {
        inserted: PriorityKey,
        top: PriorityKey,
    },

    /// A backend failed to produce a player for an asset.
    #[error("Failed to create player for music {id}: {reason}")]
    PlayerCreation { id: MusicId, reason: String },

    /// Intro/loop metadata does not describe a playable loop.
    #[error("Invalid loop metadata: {0}")]
    InvalidLoop(String),

    /// Configuration could not be parsed.
    #[error("Invalid music stack configuration: {0}")]
    Config(String),

    /// Audio output or decoding failure.
    #[error("Audio backend error: {0}")]
    Audio(String),
}

impl MusicStackError {
    /// Creates a player creation error for the given asset id
    pub fn player_creation(id: MusicId, reason: impl Into<String>) -> Self {
        MusicStackError::PlayerCreation {
            id,
            reason: reason.into(),
        }
    }

    /// Creates an invalid loop error
    pub fn invalid_loop(reason: impl Into<String>) -> Self {
        MusicStackError::InvalidLoop(reason.into())
    }

    /// Creates an audio backend error
    pub fn audio(reason: impl Into<String>) -> Self {
        MusicStackError::Audio(reason.into())
    }

    /// Whether this error signals a bug in the caller rather than a runtime failure.
    pub fn is_programmer_error(&self) -> bool {
        matches!(
            self,
            MusicStackError::UnknownKey(_) | MusicStackError::OrderingViolation { .. }
        )
    }
}

impl From<ron::error::SpannedError> for MusicStackError {
    fn from(err: ron::error::SpannedError) -> Self {
        MusicStackError::Config(err.to_string())
    }
}

/// Type alias for Result using MusicStackError
pub type Result<T> = std::result::Result<T, MusicStackError>;
