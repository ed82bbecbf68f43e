//! Log tooling for Crible watchers.
//!
//! Provides the reverse chunked line scanner, pure request validation, the
//! `QueryLimits` range policy, and a `LogSource` abstraction (filesystem or
//! in-memory) for testability.

pub mod error;
pub mod limits;
pub mod mock;
pub mod scanner;
pub mod source;
pub mod validate;

// Re-export key types for convenience
pub use error::{LimitsError, LogResult, ScanError, ValidationError};
pub use limits::QueryLimits;
pub use mock::MockLogSource;
pub use scanner::{DEFAULT_BLOCK_SIZE, ReverseLineScanner, scan};
pub use source::{FileLogSource, LogSource};
pub use validate::{ValidatedQuery, validate};
