//! Custom field validators used by `#[derive(Validate)]` DTOs.

use validator::ValidationError;

/// Reject values that are empty or whitespace-only.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_is_blank() {
        assert!(not_blank("").is_err());
        assert!(not_blank(" \t ").is_err());
    }

    #[test]
    fn text_is_not_blank() {
        assert!(not_blank(" Oak ").is_ok());
    }
}
