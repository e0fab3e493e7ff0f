// src/lib.rs
pub use directory::{InMemoryDirectory, UserDirectory};
pub use error::PolicyError;
pub use evaluator::PermissionEvaluator;
pub use resolver::{GrantResolver, matching_grants};
pub use types::*;

mod directory;
mod error;
mod evaluator;
#[cfg(feature = "observability")]
pub mod metrics;
pub mod parser;
mod resolver;
mod timers;
mod types;
