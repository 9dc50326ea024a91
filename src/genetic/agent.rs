use std::fmt;
use std::future::Future;

use futures::future::{BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};

use crate::error::SpawnError;
use crate::network::network::Network;

/// A network together with the fitness it scored in one epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub network: Network,
    pub fitness: f64,
}

/// What a fitness callback hands back: a score now, or one later.
///
/// Pending scores of an epoch are awaited together, so every evaluation that
/// returns `Pending` runs concurrently with the others.
pub enum Fitness {
    Ready(f64),
    Pending(BoxFuture<'static, Result<f64, SpawnError>>),
}

impl Fitness {
    pub fn pending<F>(future: F) -> Fitness
    where
        F: Future<Output = Result<f64, SpawnError>> + Send + 'static,
    {
        Fitness::Pending(future.boxed())
    }
}

impl From<f64> for Fitness {
    fn from(score: f64) -> Self {
        Fitness::Ready(score)
    }
}

impl fmt::Debug for Fitness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fitness::Ready(score) => f.debug_tuple("Ready").field(score).finish(),
            Fitness::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}
