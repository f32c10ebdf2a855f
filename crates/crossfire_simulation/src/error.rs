//! Composition-time errors
//!
//! Everything here is fatal at startup: an app that fails to compose never ticks.
//! Runtime conditions (empty clip, zero health, fuzzy holds) are not errors;
//! they are ordinary transition triggers handled by the controllers.

use std::path::PathBuf;

use thiserror::Error;

use crate::ai::fuzzy::FuzzyError;

/// Errors raised while loading configuration or wiring the duel
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Config file could not be read
    #[error("failed to read config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for `DuelConfig`
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// A config value is out of its allowed domain
    #[error("invalid config value `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    /// Fuzzy model (variables / rule book) could not be built
    #[error("fuzzy model: {0}")]
    Fuzzy(#[from] FuzzyError),

    /// A collaborator an agent depends on is absent (opponent, perception, ...)
    #[error("agent {agent} is missing {dependency}")]
    MissingDependency {
        agent: String,
        dependency: &'static str,
    },
}
