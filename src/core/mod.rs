pub mod error;
pub mod types;

pub use error::{MaintError, Result, StoreError};
pub use types::{Document, KeepSet, MutationIntent, Operation};
