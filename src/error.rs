//! Error types shared by every part of the crate.

use thiserror::Error;

/// Error returned by a fitness callback; boxed so hosts can use their own types.
pub type SpawnError = Box<dyn std::error::Error + Send + Sync>;

/// The result type used across the crate.
pub type Result<T> = std::result::Result<T, NetError>;

#[derive(Debug, Error)]
pub enum NetError {
    #[error("invalid shape {shape:?}: need at least 2 layers, each with at least one neuron")]
    InvalidShape { shape: Vec<usize> },

    #[error("expected {expected} activations (one per non-input layer), got {actual}")]
    InvalidActivationCount { expected: usize, actual: usize },

    #[error("input has {actual} values, the input layer has {expected} neurons")]
    InputSizeMismatch { expected: usize, actual: usize },

    #[error("target has {actual} values, the output layer has {expected} neurons")]
    TargetSizeMismatch { expected: usize, actual: usize },

    #[error("invalid filter {value:?}: expected \"both\", \"weights\" or \"biases\"")]
    InvalidFilter { value: String },

    #[error("unknown activation {name:?}")]
    InvalidActivation { name: String },

    #[error("invalid initializer: {message}")]
    InvalidInitializer { message: String },

    #[error("invalid evolution config: {message}")]
    InvalidEvolutionConfig { message: String },

    #[error("invalid dataset: {message}")]
    InvalidDataset { message: String },

    #[error("malformed network: {message}")]
    MalformedNetwork { message: String },

    #[error("fitness evaluation of agent {index} failed: {source}")]
    Spawn {
        index: usize,
        #[source]
        source: SpawnError,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
