use serde::{Deserialize, Serialize};

use crate::activation::Activation;
use crate::error::{NetError, Result};
use crate::network::network::Network;

/// Activation assignment for a network's non-input layers.
///
/// `Uniform` is broadcast to every layer; `PerLayer` must name exactly one
/// activation per non-input layer. In JSON this is either a single tag
/// (`"ReLU"`) or an array of tags (`["ReLU", "Sigmoid"]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Activations {
    Uniform(Activation),
    PerLayer(Vec<Activation>),
}

impl Activations {
    /// Expands to one activation per non-input layer.
    pub fn resolve(&self, size: usize) -> Result<Vec<Activation>> {
        match self {
            Activations::Uniform(a) => Ok(vec![*a; size]),
            Activations::PerLayer(list) if list.len() == size => Ok(list.clone()),
            Activations::PerLayer(list) => Err(NetError::InvalidActivationCount {
                expected: size,
                actual: list.len(),
            }),
        }
    }
}

impl From<Activation> for Activations {
    fn from(a: Activation) -> Self {
        Activations::Uniform(a)
    }
}

impl From<Vec<Activation>> for Activations {
    fn from(list: Vec<Activation>) -> Self {
        Activations::PerLayer(list)
    }
}

impl From<&[Activation]> for Activations {
    fn from(list: &[Activation]) -> Self {
        Activations::PerLayer(list.to_vec())
    }
}

impl<const N: usize> From<[Activation; N]> for Activations {
    fn from(list: [Activation; N]) -> Self {
        Activations::PerLayer(list.to_vec())
    }
}

/// A serializable description of a network architecture, without weights.
///
/// Lets a host keep architecture configurations on disk and build fresh,
/// zero-filled networks from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    /// Neurons per layer, input first.
    pub shape: Vec<usize>,
    pub activation: Activations,
}

impl NetworkSpec {
    pub fn new(shape: Vec<usize>, activation: impl Into<Activations>) -> NetworkSpec {
        NetworkSpec { shape, activation: activation.into() }
    }

    pub fn build(&self) -> Result<Network> {
        Network::create(&self.shape, self.activation.clone())
    }

    /// Serializes the spec to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a `NetworkSpec` from a JSON file.
    pub fn load_json(path: &str) -> Result<NetworkSpec> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}
