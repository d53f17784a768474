//! Error types.
//!
//! - [`DistributionError`]: a distribution was parameterised outside its
//!   domain. Always a caller misconfiguration; never corrected silently.
//! - [`RollError`]: anything a roll, a seed generation or an options load
//!   can fail with.

use thiserror::Error;

/// Error type for invalid distribution parameters.
///
/// # Examples
/// ```
/// use u_roll::error::DistributionError;
///
/// let err = DistributionError::InvalidParameters("Gamma requires α > 0".into());
/// assert_eq!(err.to_string(), "invalid distribution parameters: Gamma requires α > 0");
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DistributionError {
    /// Parameters violate distribution constraints.
    #[error("invalid distribution parameters: {0}")]
    InvalidParameters(String),
}

/// Errors surfaced by sources, casters and option loading.
#[derive(Debug, Error)]
pub enum RollError {
    /// A distribution rejected the parameters derived from the configuration.
    #[error(transparent)]
    Distribution(#[from] DistributionError),

    /// The operating system entropy source could not produce a seed.
    #[error("entropy source unavailable: {0}")]
    Entropy(String),

    /// An options document could not be parsed.
    #[error("invalid options: {0}")]
    Config(String),
}
