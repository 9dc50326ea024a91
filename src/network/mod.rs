pub mod backprop;
pub mod forward;
pub mod network;
pub mod spec;

pub use forward::ForwardPass;
pub use network::Network;
pub use spec::{Activations, NetworkSpec};
