use serde::{Deserialize, Serialize};

use crate::activation::Activation;
use crate::error::{NetError, Result};
use crate::math::matrix::Matrix;
use crate::network::spec::Activations;

/// A fully connected feed-forward network.
///
/// Layer `0` is the input layer; `weights[i]`, `biases[i]` and `activation[i]`
/// belong to layer `i + 1`. `layers` caches the signals of the most recent
/// [`Network::predict`] call (post-activation for every layer, raw input for
/// layer `0`).
///
/// `Clone` is a deep copy: a clone shares no storage with its original.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Network {
    /// Number of non-input layers.
    pub size: usize,
    pub shape: Vec<usize>,
    pub layers: Vec<Vec<f64>>,
    /// `weights[i]` is `shape[i + 1] × shape[i]`: row = destination, column = source.
    pub weights: Vec<Matrix>,
    pub biases: Vec<Vec<f64>>,
    pub activation: Vec<Activation>,
}

impl Network {
    /// Builds a zero-filled network.
    ///
    /// `activation` is either one kind applied to every non-input layer or
    /// exactly one kind per non-input layer.
    pub fn create(shape: &[usize], activation: impl Into<Activations>) -> Result<Network> {
        if shape.len() < 2 || shape.contains(&0) {
            return Err(NetError::InvalidShape { shape: shape.to_vec() });
        }
        let size = shape.len() - 1;
        let activation = activation.into().resolve(size)?;

        let layers = shape.iter().map(|&n| vec![0.0; n]).collect();
        let weights = shape.windows(2).map(|w| Matrix::zeros(w[1], w[0])).collect();
        let biases = shape[1..].iter().map(|&n| vec![0.0; n]).collect();

        Ok(Network {
            size,
            shape: shape.to_vec(),
            layers,
            weights,
            biases,
            activation,
        })
    }

    pub fn input_size(&self) -> usize {
        self.shape[0]
    }

    pub fn output_size(&self) -> usize {
        self.shape[self.size]
    }

    /// Total number of weights and biases.
    pub fn parameter_count(&self) -> usize {
        self.shape
            .windows(2)
            .map(|w| w[0] * w[1] + w[1])
            .sum()
    }

    /// Every weight and bias, weights before biases, layer by layer.
    pub fn parameters_mut(&mut self) -> impl Iterator<Item = &mut f64> {
        self.weights
            .iter_mut()
            .flat_map(Matrix::iter_mut)
            .chain(self.biases.iter_mut().flatten())
    }

    /// Checks every structural invariant. Networks built by [`Network::create`]
    /// always pass; this guards networks that arrive from outside (e.g. JSON).
    pub fn validate(&self) -> Result<()> {
        if self.shape.len() < 2 || self.shape.contains(&0) {
            return Err(NetError::InvalidShape { shape: self.shape.clone() });
        }
        let size = self.shape.len() - 1;
        let malformed = |message: String| Err(NetError::MalformedNetwork { message });

        if self.size != size {
            return malformed(format!("size is {} but shape has {size} non-input layers", self.size));
        }
        if self.activation.len() != size {
            return Err(NetError::InvalidActivationCount {
                expected: size,
                actual: self.activation.len(),
            });
        }
        if self.weights.len() != size || self.biases.len() != size || self.layers.len() != size + 1 {
            return malformed(format!(
                "expected {size} weight matrices, {size} bias vectors and {} layers; got {}, {} and {}",
                size + 1,
                self.weights.len(),
                self.biases.len(),
                self.layers.len()
            ));
        }
        for (i, layer) in self.layers.iter().enumerate() {
            if layer.len() != self.shape[i] {
                return malformed(format!(
                    "layer {i} holds {} signals, shape says {}",
                    layer.len(),
                    self.shape[i]
                ));
            }
        }
        for (i, (w, b)) in self.weights.iter().zip(&self.biases).enumerate() {
            let (rows, cols) = (self.shape[i + 1], self.shape[i]);
            if w.rows != rows || w.cols != cols || w.data.len() != rows {
                return malformed(format!(
                    "weights[{i}] is {}x{}, expected {rows}x{cols}",
                    w.rows, w.cols
                ));
            }
            if b.len() != rows {
                return malformed(format!("biases[{i}] has {} entries, expected {rows}", b.len()));
            }
            if w.iter().chain(b).any(|v| !v.is_finite()) {
                return malformed(format!("layer {} holds a non-finite parameter", i + 1));
            }
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses and validates a network previously written by [`Network::to_json`].
    pub fn from_json(json: &str) -> Result<Network> {
        let network: Network = serde_json::from_str(json)?;
        network.validate()?;
        Ok(network)
    }

    /// Serializes the network to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a network from a JSON file previously written by `save_json`.
    pub fn load_json(path: &str) -> Result<Network> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let network: Network = serde_json::from_reader(reader)?;
        network.validate()?;
        Ok(network)
    }
}
