//! # Gesture-Core
//!
//! Core types and utilities for the IMU gesture classification
//! training pipeline.

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::*;
