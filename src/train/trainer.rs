use crate::error::{NetError, Result};
use crate::network::network::Network;

/// One online pass over `inputs` in the given order: a backpropagation step
/// per sample. Returns the mean error of the pass.
pub fn train_network(
    network: &mut Network,
    inputs: &[Vec<f64>],
    expected_outputs: &[Vec<f64>],
    learning_rate: f64,
) -> Result<f64> {
    let order: Vec<usize> = (0..inputs.len()).collect();
    train_in_order(network, inputs, expected_outputs, &order, learning_rate)
}

pub(crate) fn check_dataset(inputs: &[Vec<f64>], expected_outputs: &[Vec<f64>]) -> Result<()> {
    if inputs.is_empty() {
        return Err(NetError::InvalidDataset { message: "no samples".to_string() });
    }
    if inputs.len() != expected_outputs.len() {
        return Err(NetError::InvalidDataset {
            message: format!(
                "{} inputs but {} expected outputs",
                inputs.len(),
                expected_outputs.len()
            ),
        });
    }
    Ok(())
}

pub(crate) fn train_in_order(
    network: &mut Network,
    inputs: &[Vec<f64>],
    expected_outputs: &[Vec<f64>],
    order: &[usize],
    learning_rate: f64,
) -> Result<f64> {
    check_dataset(inputs, expected_outputs)?;

    let mut total_loss = 0.0;
    for &idx in order {
        total_loss += network.backpropagate(&inputs[idx], &expected_outputs[idx], learning_rate)?;
    }
    Ok(total_loss / order.len() as f64)
}
