use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::NetError;
use crate::network::network::Network;

/// Which parameters an initializer touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    #[default]
    Both,
    Weights,
    Biases,
}

impl Filter {
    pub fn weights(self) -> bool {
        matches!(self, Filter::Both | Filter::Weights)
    }

    pub fn biases(self) -> bool {
        matches!(self, Filter::Both | Filter::Biases)
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Filter::Both => "both",
            Filter::Weights => "weights",
            Filter::Biases => "biases",
        })
    }
}

impl FromStr for Filter {
    type Err = NetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "both" => Ok(Filter::Both),
            "weights" => Ok(Filter::Weights),
            "biases" => Ok(Filter::Biases),
            other => Err(NetError::InvalidFilter { value: other.to_string() }),
        }
    }
}

impl Network {
    /// Visits every parameter selected by `filter` and overwrites it with
    /// whatever `visitor` returns; `None` leaves the slot as it is.
    ///
    /// The visitor receives `(layer, neuron, source)` where `layer` indexes
    /// `weights`/`biases`, `neuron` is the destination neuron and `source` is
    /// `None` for a bias or `Some(k)` for the weight coming from neuron `k` of
    /// the previous layer. Order: layer by layer, neuron by neuron, each
    /// neuron's bias before its incoming weights.
    pub fn initialize<F>(&mut self, mut visitor: F, filter: Filter)
    where
        F: FnMut(usize, usize, Option<usize>) -> Option<f64>,
    {
        for layer in 0..self.size {
            for neuron in 0..self.shape[layer + 1] {
                if filter.biases() {
                    if let Some(v) = visitor(layer, neuron, None) {
                        self.biases[layer][neuron] = v;
                    }
                }
                if filter.weights() {
                    for (source, w) in self.weights[layer].data[neuron].iter_mut().enumerate() {
                        if let Some(v) = visitor(layer, neuron, Some(source)) {
                            *w = v;
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::Activation;

    fn net() -> Network {
        let mut net = Network::create(&[2, 3, 1], Activation::Sigmoid).unwrap();
        net.initialize(|_, _, _| Some(-1.0), Filter::Both);
        net
    }

    #[test]
    fn weights_filter_leaves_biases() {
        let mut net = net();
        net.initialize(|_, _, _| Some(5.0), Filter::Weights);
        assert!(net.weights.iter().flat_map(|m| m.iter()).all(|&w| w == 5.0));
        assert!(net.biases.iter().flatten().all(|&b| b == -1.0));
    }

    #[test]
    fn biases_filter_leaves_weights() {
        let mut net = net();
        net.initialize(|_, _, _| Some(5.0), Filter::Biases);
        assert!(net.weights.iter().flat_map(|m| m.iter()).all(|&w| w == -1.0));
        assert!(net.biases.iter().flatten().all(|&b| b == 5.0));
    }

    #[test]
    fn none_keeps_the_slot_and_zero_overwrites_it() {
        let mut net = net();
        net.initialize(
            |layer, _, source| match (layer, source) {
                (0, Some(_)) => Some(0.0),
                _ => None,
            },
            Filter::Both,
        );
        assert!(net.weights[0].iter().all(|&w| w == 0.0));
        assert!(net.weights[1].iter().all(|&w| w == -1.0));
        assert!(net.biases.iter().flatten().all(|&b| b == -1.0));
    }

    #[test]
    fn visits_in_layer_then_neuron_order() {
        let mut net = Network::create(&[2, 2, 1], Activation::Linear).unwrap();
        let mut seen = Vec::new();
        net.initialize(
            |l, n, s| {
                seen.push((l, n, s));
                None
            },
            Filter::Both,
        );
        assert_eq!(
            seen,
            vec![
                (0, 0, None),
                (0, 0, Some(0)),
                (0, 0, Some(1)),
                (0, 1, None),
                (0, 1, Some(0)),
                (0, 1, Some(1)),
                (1, 0, None),
                (1, 0, Some(0)),
                (1, 0, Some(1)),
            ]
        );
    }

    #[test]
    fn visitor_writes_land_in_the_addressed_slot() {
        let mut net = Network::create(&[3, 2], Activation::Linear).unwrap();
        net.initialize(
            |_, n, s| Some(match s {
                Some(k) => (10 * n + k) as f64,
                None => -(n as f64),
            }),
            Filter::Both,
        );
        assert_eq!(net.weights[0].data, vec![vec![0.0, 1.0, 2.0], vec![10.0, 11.0, 12.0]]);
        assert_eq!(net.biases[0], vec![0.0, -1.0]);
    }

    #[test]
    fn filter_parses_known_names_only() {
        assert_eq!("weights".parse::<Filter>().unwrap(), Filter::Weights);
        assert_eq!("biases".parse::<Filter>().unwrap(), Filter::Biases);
        assert_eq!("both".parse::<Filter>().unwrap(), Filter::Both);
        assert!(matches!(
            "neurons".parse::<Filter>(),
            Err(NetError::InvalidFilter { value }) if value == "neurons"
        ));
    }
}
