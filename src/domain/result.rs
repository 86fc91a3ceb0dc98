//! Result type alias for benesync

use super::errors::SyncError;

/// Result type alias for benesync operations
///
/// # Examples
///
/// ```
/// use benesync::domain::result::Result;
/// use benesync::domain::errors::SyncError;
///
/// fn failing_function() -> Result<()> {
///     Err(SyncError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, SyncError>;
