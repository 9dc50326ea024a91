//! A small feed-forward neural network with two ways to train it: online
//! backpropagation and a mutation-only genetic search driven by a fitness
//! callback.

pub mod error;
pub mod math;
pub mod activation;
pub mod network;
pub mod init;
pub mod loss;
pub mod train;
pub mod genetic;

// Convenience re-exports
pub use error::{NetError, Result, SpawnError};
pub use math::matrix::Matrix;
pub use activation::activation::Activation;
pub use network::{Activations, ForwardPass, Network, NetworkSpec};
pub use init::{Filter, Init};
pub use loss::mse::MseLoss;
pub use train::{train_loop, train_network, EpochStats, TrainConfig};
pub use genetic::{Agent, Evolution, EvolutionConfig, Fitness};
