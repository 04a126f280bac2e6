pub mod cancel;
pub mod config;
pub mod error;
pub mod math;
pub mod network;
pub mod operations;

pub use cancel::CancelFlag;
pub use error::{Result, TraynetError};
