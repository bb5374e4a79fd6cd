use thiserror::Error;

/// The only error a lookup surfaces. Provider failures are absorbed into
/// per-provider reports instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}
