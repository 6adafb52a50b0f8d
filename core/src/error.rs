//! Error types surfaced by the simulation crates.

use thiserror::Error;

use crate::EntityId;

/// Failures detected while assembling a state machine.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StateMachineError {
    /// A key of the closed state set has no registered behaviour.
    #[error("no state registered for key `{key}`")]
    MissingState {
        /// Debug representation of the missing key.
        key: String,
    },
}

/// Reasons a mana withdrawal can fail.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum ManaError {
    /// The pool holds less mana than requested.
    #[error("insufficient mana: required {required}, available {available}")]
    Insufficient {
        /// Amount the caller attempted to spend.
        required: f32,
        /// Amount held by the pool at the time of the request.
        available: f32,
    },
    /// The requested amount was negative or not a finite number.
    #[error("invalid mana amount {0}")]
    InvalidAmount(f32),
}

/// Failures raised while constructing a game session.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// A session needs at least two opposing teams.
    #[error("a session requires at least two teams, got {0}")]
    NotEnoughTeams(usize),
    /// Two teams share an identifier.
    #[error("duplicate team id `{0}`")]
    DuplicateTeam(EntityId),
    /// A team has no players and would be defeated before the first tick.
    #[error("team `{0}` has no players")]
    EmptyTeam(EntityId),
    /// Two players share an identifier.
    #[error("duplicate player id `{0}`")]
    DuplicatePlayer(EntityId),
    /// The unit state set failed validation.
    #[error(transparent)]
    StateMachine(#[from] StateMachineError),
}

/// Failures raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML document could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    /// A value is outside its permitted range.
    #[error("invalid configuration value `{field}`: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Human readable explanation.
        reason: &'static str,
    },
}
