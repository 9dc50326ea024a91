use log::{trace, warn};

use crate::error::{NetError, Result};
use crate::loss::mse::MseLoss;
use crate::network::forward::ForwardPass;
use crate::network::network::Network;

impl Network {
    /// One step of online gradient descent towards `expected` for `input`.
    ///
    /// The forward pass is recomputed here, so the result never depends on
    /// what the last `predict` call left in `layers`; `layers` is refreshed
    /// with the pre-update signals afterwards. Returns the mean squared error
    /// of the prediction made before the update.
    pub fn backpropagate(&mut self, input: &[f64], expected: &[f64], learning_rate: f64) -> Result<f64> {
        self.check_target(expected)?;
        let pass = self.forward(input)?;
        let error = self.backpropagate_pass(&pass, expected, learning_rate)?;
        self.layers = pass.signals;
        Ok(error)
    }

    /// Applies the gradient step for an already computed forward pass.
    ///
    /// `pass` must come from [`Network::forward`] on this network with its
    /// current parameters. Returns the mean squared error of `pass`'s output.
    pub fn backpropagate_pass(
        &mut self,
        pass: &ForwardPass,
        expected: &[f64],
        learning_rate: f64,
    ) -> Result<f64> {
        self.check_target(expected)?;
        if pass.sums.len() != self.size
            || pass.signals.len() != self.size + 1
            || pass.sums.iter().zip(&self.shape[1..]).any(|(z, &n)| z.len() != n)
        {
            return Err(NetError::MalformedNetwork {
                message: "forward pass does not match the network's shape".to_string(),
            });
        }
        if pass.input().len() != self.input_size() {
            return Err(NetError::InputSizeMismatch {
                expected: self.input_size(),
                actual: pass.input().len(),
            });
        }

        let output = pass.output();
        let error = MseLoss::loss(output, expected);
        if !error.is_finite() {
            warn!("backpropagation produced a non-finite error ({error})");
        }

        // δ for every non-input layer, computed against the current weights
        // before any of them change.
        let last = self.size - 1;
        let mut deltas = vec![Vec::new(); self.size];
        let out_act = self.activation[last];
        deltas[last] = MseLoss::derivative(output, expected)
            .iter()
            .zip(&pass.sums[last])
            .map(|(&grad, &z)| -grad * out_act.derivative(z))
            .collect();

        for i in (0..last).rev() {
            let act = self.activation[i];
            let propagated = self.weights[i + 1].transpose_mul_vec(&deltas[i + 1]);
            deltas[i] = propagated
                .iter()
                .zip(&pass.sums[i])
                .map(|(&err, &z)| err * act.derivative(z))
                .collect();
        }

        for (i, delta) in deltas.iter().enumerate() {
            let inputs = &pass.signals[i];
            for (j, &d) in delta.iter().enumerate() {
                let step = learning_rate * d;
                for (w, &x) in self.weights[i].data[j].iter_mut().zip(inputs) {
                    *w += step * x;
                }
                self.biases[i][j] += step;
            }
        }

        trace!("backpropagation step: lr={learning_rate}, error={error:.6}");
        Ok(error)
    }

    fn check_target(&self, expected: &[f64]) -> Result<()> {
        if expected.len() != self.output_size() {
            return Err(NetError::TargetSizeMismatch {
                expected: self.output_size(),
                actual: expected.len(),
            });
        }
        Ok(())
    }
}
