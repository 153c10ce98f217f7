pub mod annotate;
pub mod api;
pub mod cache;
pub mod config;
pub mod corpus;
pub mod engine;
pub mod error;
pub mod extract;
pub mod layouts;
pub mod model;
pub mod util;

pub use crate::engine::{corrupt, corrupt_batch, Corruption, Corruptor, Tally};
pub use crate::error::{TfResult, TypoError};
pub use crate::model::{Operation, ProbabilityModel};
