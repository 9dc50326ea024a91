use crate::error::{NetError, Result};
use crate::network::network::Network;

/// Everything one forward pass computed.
///
/// `signals[0]` is the input and `signals[i]` (i ≥ 1) the post-activation
/// output of layer `i`; `sums[i]` is the pre-activation weighted sum of layer
/// `i + 1`. Backpropagation needs both.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardPass {
    pub signals: Vec<Vec<f64>>,
    pub sums: Vec<Vec<f64>>,
}

impl ForwardPass {
    pub fn input(&self) -> &[f64] {
        &self.signals[0]
    }

    pub fn output(&self) -> &[f64] {
        // signals always holds the input plus at least one layer
        &self.signals[self.signals.len() - 1]
    }
}

impl Network {
    /// Runs the input through every layer without touching the network.
    pub fn forward(&self, input: &[f64]) -> Result<ForwardPass> {
        if input.len() != self.input_size() {
            return Err(NetError::InputSizeMismatch {
                expected: self.input_size(),
                actual: input.len(),
            });
        }

        let mut signals = Vec::with_capacity(self.size + 1);
        let mut sums = Vec::with_capacity(self.size);
        signals.push(input.to_vec());

        for i in 0..self.size {
            let mut z = self.weights[i].mul_vec(&signals[i]);
            for (zj, b) in z.iter_mut().zip(&self.biases[i]) {
                *zj += b;
            }
            let act = self.activation[i];
            let a = z.iter().map(|&x| act.function(x)).collect();
            sums.push(z);
            signals.push(a);
        }

        Ok(ForwardPass { signals, sums })
    }

    /// Forward pass that also records every layer's signal in `self.layers`.
    /// Returns a copy of the output layer.
    pub fn predict(&mut self, input: &[f64]) -> Result<Vec<f64>> {
        let pass = self.forward(input)?;
        let output = pass.output().to_vec();
        self.layers = pass.signals;
        Ok(output)
    }
}
