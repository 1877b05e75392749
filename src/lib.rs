pub mod config;
pub mod domain;
pub mod error;
pub mod gate;
pub mod process;
pub mod service;

pub use error::{Result, TrackingError};
