//! # relay-server
//!
//! HTTP boundary for Relay: the axum surface over the task gateway and the
//! default device work function. The routing layer is deliberately thin;
//! everything interesting lives in `relay-task`.

pub mod handlers;
pub mod server;
pub mod work;

pub use handlers::TaskQueuedResponse;
pub use server::{build_router, serve, AppState, ServerConfig};
pub use work::DeviceWork;
