//! # CLI Error Type
//!
//! Everything that can stop a command, and the exit code it maps to.
//!
//! ```text
//! ValidationError ─► CoreError ─► StoreError ─┐
//!                        │                    ├─► CliError ─► main ─► stderr + exit code
//!   io / toml / json ────┴────────────────────┘
//! ```

use std::io;
use thiserror::Error;

use loyalty_core::CoreError;
use loyalty_store::StoreError;

#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid configuration (bad file, empty path, ...).
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Process exit code for this error.
    ///
    /// | Code | Meaning                         |
    /// |------|---------------------------------|
    /// | 2    | Configuration problem           |
    /// | 3    | Unknown product, coupon or card |
    /// | 4    | Card state rule violated        |
    /// | 1    | Anything else                   |
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config(_) | CliError::Toml(_) => 2,
            CliError::Store(e) if e.is_not_found() => 3,
            CliError::Core(e) if e.is_invalid_state() => 4,
            CliError::Core(CoreError::CouponNotOwned { .. })
            | CliError::Core(CoreError::InsufficientBalance { .. }) => 4,
            _ => 1,
        }
    }
}

pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::Config("x".into()).exit_code(), 2);
        assert_eq!(
            CliError::from(StoreError::not_found("Card", "99999")).exit_code(),
            3
        );
        assert_eq!(
            CliError::from(CoreError::CouponNotOwned {
                card: "10101".into(),
                coupon: "1014".into(),
            })
            .exit_code(),
            4
        );
        assert_eq!(
            CliError::from(io::Error::new(io::ErrorKind::Other, "boom")).exit_code(),
            1
        );
    }

    #[test]
    fn test_store_message_passes_through() {
        let err = CliError::from(StoreError::not_found("Product", "124-421"));
        assert_eq!(err.to_string(), "Product not found: 124-421");
    }
}
