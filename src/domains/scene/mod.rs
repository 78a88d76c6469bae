pub mod builder;
pub mod elements;
pub mod ids;
pub mod ports;
pub mod registry;

pub use builder::*;
pub use elements::*;
pub use ids::*;
pub use ports::*;
pub use registry::*;
