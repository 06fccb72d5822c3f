//! Typed failures surfaced to the caller
//!
//! Validation failures are reported, never thrown: every public operation
//! that can be refused returns one of these and leaves the simulation
//! untouched.

use thiserror::Error;

/// Why a path definition could not be turned into a [`crate::sim::PathModel`]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PathError {
    #[error("path needs at least two waypoints, got {0}")]
    TooFewWaypoints(usize),
    #[error("path has zero total length")]
    ZeroLength,
    #[error("waypoint {0} is not a finite coordinate")]
    NonFinite(usize),
}

/// Why a tower placement was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("towers can only be placed during the build phase")]
    WrongPhase,
    #[error("unknown tower type `{0}`")]
    UnknownTowerType(String),
    #[error("insufficient funds")]
    InsufficientFunds { cost: u32, money: u32 },
    #[error("invalid location")]
    InvalidLocation,
}

/// Why a wave could not be started
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StartWaveError {
    #[error("place at least one tower before starting a wave")]
    NoTowers,
    #[error("a wave is already running")]
    AlreadyRunning,
    #[error("the game is over, reset to play again")]
    GameOver,
}

/// Key/value storage failure
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend unavailable")]
    Unavailable,
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration (settings or catalog) could not be loaded
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
