//! # Gesture-Model
//!
//! Dense neural classifier for IMU gesture recognition, built on
//! candle.
//!
//! ## Architecture
//!
//! `Dense(50, relu) -> Dense(15, relu) -> Dense(n_gestures, softmax)`
//!
//! The network consumes the flattened, normalized feature vectors
//! produced by `gesture-signal` and emits one softmax probability per
//! gesture in the vocabulary. Training minimizes mean squared error
//! against one-hot targets and tracks mean absolute error; trained
//! weights export to safetensors for deployment.

pub mod evaluate;
pub mod export;
pub mod model;
pub mod training;

pub use evaluate::*;
pub use export::*;
pub use model::*;
pub use training::*;
