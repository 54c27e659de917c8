pub mod config;
pub mod error;

pub use config::TrainerConfig;
pub use error::{Result, TrainerError};
