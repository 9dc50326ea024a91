use std::sync::mpsc;
use std::thread;

use nanoai::{train_loop, Activation, EpochStats, Filter, Init, Network, TrainConfig};

fn main() -> nanoai::Result<()> {
    env_logger::init();

    let mut network = Network::create(&[2, 4, 1], [Activation::TanH, Activation::Sigmoid])?;
    network.init(&Init::xavier_uniform(), Filter::Both)?;

    let inputs = vec![
        vec![1.0, 0.0],
        vec![1.0, 1.0],
        vec![0.0, 1.0],
        vec![0.0, 0.0],
    ];
    let expected_outputs = vec![
        vec![1.0],
        vec![0.0],
        vec![1.0],
        vec![0.0],
    ];

    let (tx, rx) = mpsc::channel::<EpochStats>();
    let config = TrainConfig::new(5000, 0.5).progress(tx);

    let final_loss = thread::scope(|s| {
        let (net, inputs, labels) = (&mut network, &inputs, &expected_outputs);
        // The config (and its sender) moves into the worker, so `rx` ends with it.
        let worker = s.spawn(move || train_loop(net, inputs, labels, &config));
        for stats in rx {
            if stats.epoch % 1000 == 0 {
                println!(
                    "Epoch {}/{}: loss = {:.6} ({} ms)",
                    stats.epoch, stats.total_epochs, stats.train_loss, stats.elapsed_ms
                );
            }
        }
        worker.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic))
    })?;

    println!("Final loss: {final_loss:.6}");
    for input in &inputs {
        println!("Input: {:?} -> Output: {:.4}", input, network.predict(input)?[0]);
    }
    Ok(())
}
