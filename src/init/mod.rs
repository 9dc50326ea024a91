pub mod initializer;
pub mod policy;

pub use initializer::Filter;
pub use policy::Init;
