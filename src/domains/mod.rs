pub mod logger;
pub mod scene;

pub use logger::*;
pub use scene::*;
