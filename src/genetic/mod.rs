pub mod agent;
pub mod config;
pub mod evolution;

pub use agent::{Agent, Fitness};
pub use config::EvolutionConfig;
pub use evolution::Evolution;
