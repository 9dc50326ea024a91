// This binary is intentionally minimal.
// All neural network logic lives in the library (src/lib.rs and its modules).
// Run the demos with:
//   cargo run --example xor
//   cargo run --example evolve
use nanoai::{Activation, Filter, Init, Network};

fn main() -> nanoai::Result<()> {
    env_logger::init();

    let mut network = Network::create(&[2, 3, 1], [Activation::TanH, Activation::Sigmoid])?;
    network.init(&Init::xavier_uniform(), Filter::Both)?;
    let output = network.predict(&[1.0, 0.0])?;

    println!("nanoai: a from-scratch neural network library in Rust.");
    println!("Untrained [2, 3, 1] network on [1, 0] -> {:.4}", output[0]);
    println!("Run `cargo run --example xor` or `cargo run --example evolve` for the demos.");
    Ok(())
}
