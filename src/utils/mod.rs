//! Utility functions and helpers

pub mod data_loader;

pub use data_loader::{DataLoader, Dataset};
