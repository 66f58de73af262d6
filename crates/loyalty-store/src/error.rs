//! # Store Error Types
//!
//! Error types for lookups and data file loading.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  io::Error / bad column / unknown id                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Adds file, line and entity context         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CliError (in loyalty-cli) ← Printed to stderr                         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use loyalty_core::{CoreError, ValidationError};

/// Repository and loader errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Entity not found.
    ///
    /// ## When This Occurs
    /// - Selling a barcode the catalog does not list
    /// - A coupon file listing an unknown barcode
    /// - A card file listing an unknown coupon number
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// An entity with the same key is already stored.
    #[error("Duplicate {entity}: '{id}' already exists")]
    Duplicate { entity: String, id: String },

    /// A data file line that cannot be turned into a record.
    ///
    /// ## When This Occurs
    /// - Non-numeric price, day offset or percentage
    #[error("{source_name}:{line}: {reason}")]
    Parse {
        source_name: String,
        line: usize,
        reason: String,
    },

    /// A data file could not be read.
    #[error("Cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Domain rule violated while wiring entities together.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A record failed entity validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl StoreError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates a Duplicate error.
    pub fn duplicate(entity: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::Duplicate {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub fn parse(source_name: impl Into<String>, line: usize, reason: impl Into<String>) -> Self {
        StoreError::Parse {
            source_name: source_name.into(),
            line,
            reason: reason.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }

    /// True for lookup misses.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
