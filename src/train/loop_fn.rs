use std::sync::atomic::Ordering;
use std::time::Instant;

use log::{debug, info};
use rand::seq::SliceRandom;

use crate::error::Result;
use crate::network::network::Network;
use crate::train::epoch_stats::EpochStats;
use crate::train::train_config::TrainConfig;
use crate::train::trainer::{check_dataset, train_in_order};

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Trains `network` for `config.epochs` epochs of online SGD and returns the
/// mean training loss of the **last completed epoch** (`0.0` if none ran).
///
/// # Arguments
/// - `network`      — mutable reference to the network; modified in place
/// - `train_inputs` — training samples, each a `Vec<f64>` of length `shape[0]`
/// - `train_labels` — corresponding targets, same length as `train_inputs`
/// - `config`       — hyperparameters, optional progress channel, optional stop flag
///
/// # Early termination
/// The loop breaks early if:
/// - the `progress_tx` receiver has been dropped, **or**
/// - `config.stop_flag` is set to `true`.
///
/// # Errors
/// `InvalidDataset` for an empty or mismatched dataset; size mismatches of
/// individual samples surface from the backpropagation step.
pub fn train_loop(
    network: &mut Network,
    train_inputs: &[Vec<f64>],
    train_labels: &[Vec<f64>],
    config: &TrainConfig,
) -> Result<f64> {
    check_dataset(train_inputs, train_labels)?;

    let mut last_train_loss = 0.0;
    let mut order: Vec<usize> = (0..train_inputs.len()).collect();
    let mut rng = rand::thread_rng();

    for epoch in 1..=config.epochs {
        if stop_requested(config) {
            debug!("stop flag set before epoch {epoch}");
            break;
        }

        let t_start = Instant::now();

        if config.shuffle {
            order.shuffle(&mut rng);
        }
        let train_loss = train_in_order(
            network,
            train_inputs,
            train_labels,
            &order,
            config.learning_rate,
        )?;
        last_train_loss = train_loss;

        let elapsed_ms = t_start.elapsed().as_millis() as u64;
        debug!("epoch {epoch}/{}: loss {train_loss:.6}", config.epochs);

        let stats = EpochStats {
            epoch,
            total_epochs: config.epochs,
            train_loss,
            elapsed_ms,
        };

        if let Some(ref tx) = config.progress_tx {
            // If the receiver has been dropped, stop training.
            if tx.send(stats).is_err() {
                debug!("progress receiver dropped after epoch {epoch}");
                break;
            }
        }
    }

    info!("training finished with loss {last_train_loss:.6}");
    Ok(last_train_loss)
}

fn stop_requested(config: &TrainConfig) -> bool {
    config
        .stop_flag
        .as_ref()
        .is_some_and(|flag| flag.load(Ordering::Relaxed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::Activation;
    use crate::error::NetError;
    use crate::init::{Filter, Init};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::atomic::AtomicBool;
    use std::sync::{mpsc, Arc};

    fn xor() -> (Vec<Vec<f64>>, Vec<Vec<f64>>) {
        (
            vec![vec![0.0, 0.0], vec![0.0, 1.0], vec![1.0, 0.0], vec![1.0, 1.0]],
            vec![vec![0.0], vec![1.0], vec![1.0], vec![0.0]],
        )
    }

    fn xor_net() -> Network {
        let mut net = Network::create(&[2, 8, 1], [Activation::TanH, Activation::Sigmoid]).unwrap();
        Init::xavier_uniform()
            .apply_with_rng(&mut net, Filter::Both, &mut StdRng::seed_from_u64(42))
            .unwrap();
        net
    }

    #[test]
    fn learns_xor() {
        let (inputs, labels) = xor();
        let mut net = xor_net();
        let config = TrainConfig::new(5000, 0.5);
        let loss = train_loop(&mut net, &inputs, &labels, &config).unwrap();
        assert!(loss < 0.05, "final loss {loss}");
        for (x, y) in inputs.iter().zip(&labels) {
            let out = net.predict(x).unwrap()[0];
            assert!((out - y[0]).abs() < 0.3, "{x:?} -> {out}");
        }
    }

    #[test]
    fn sends_one_stat_per_epoch() {
        let (inputs, labels) = xor();
        let mut net = xor_net();
        let (tx, rx) = mpsc::channel();
        let config = TrainConfig::new(5, 0.1).shuffle(false).progress(tx);
        train_loop(&mut net, &inputs, &labels, &config).unwrap();
        drop(config);
        let stats: Vec<EpochStats> = rx.iter().collect();
        assert_eq!(stats.iter().map(|s| s.epoch).collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
        assert!(stats.iter().all(|s| s.total_epochs == 5));
    }

    #[test]
    fn stop_flag_prevents_training() {
        let (inputs, labels) = xor();
        let mut net = xor_net();
        let before = net.clone();
        let flag = Arc::new(AtomicBool::new(true));
        let config = TrainConfig::new(10, 0.1).stop_flag(flag);
        assert_eq!(train_loop(&mut net, &inputs, &labels, &config).unwrap(), 0.0);
        assert_eq!(net.weights, before.weights);
    }

    #[test]
    fn rejects_mismatched_dataset() {
        let (inputs, mut labels) = xor();
        labels.pop();
        let config = TrainConfig::new(1, 0.1);
        assert!(matches!(
            train_loop(&mut xor_net(), &inputs, &labels, &config),
            Err(NetError::InvalidDataset { .. })
        ));
    }
}
