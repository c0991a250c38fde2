//! Result type alias for Leadex
//!
//! This module provides a convenient Result type alias that uses LeadexError
//! as the error type.

use super::errors::LeadexError;

/// Result type alias for Leadex operations
///
/// # Examples
///
/// ```
/// use leadex::domain::result::Result;
/// use leadex::domain::errors::LeadexError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(LeadexError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, LeadexError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::{LeadexError, StoreError};

    #[test]
    fn test_result_err() {
        let result: Result<i32> = Err(LeadexError::Validation("test error".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> std::result::Result<i32, StoreError> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }
}
