pub mod compare;
pub mod docker;
pub mod error;
pub mod executor;
pub mod judge;
mod runner;
pub mod sandbox;
pub mod types;

pub use error::JudgeError;
pub use judge::Judge;
pub use types::*;
