pub mod channel_backend;
pub mod console_logger;
pub mod noop_logger;
pub mod pattern_motion;

pub use channel_backend::*;
pub use console_logger::*;
pub use noop_logger::*;
pub use pattern_motion::*;
