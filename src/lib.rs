pub mod config;
pub mod error;
pub mod interfaces;
pub mod services;
pub mod utils;

pub use error::{HarvestError, HarvestResult};
