//! Data preprocessing
//!
//! Only z-score scaling is needed by the serving pipeline.

mod scaler;

pub use scaler::StandardScaler;
