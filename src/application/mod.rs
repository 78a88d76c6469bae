pub mod backend_sync;
pub mod requests;
pub mod scene_service;

pub use backend_sync::*;
pub use requests::*;
pub use scene_service::*;
