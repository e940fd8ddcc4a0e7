//! Result type alias for Almanac

use super::errors::AlmanacError;

/// Result type alias for Almanac operations
///
/// # Examples
///
/// ```
/// use almanac::domain::result::Result;
/// use almanac::domain::errors::AlmanacError;
///
/// fn failing_function() -> Result<()> {
///     Err(AlmanacError::Validation("Invalid input".to_string()))
/// }
///
/// assert!(failing_function().is_err());
/// ```
pub type Result<T> = std::result::Result<T, AlmanacError>;
