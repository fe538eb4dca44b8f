use validator::Validate;

use crate::error::{Error, Result};

/// Runs the derived validators, reporting any failure as `message`.
pub fn validate_with_message<T: Validate>(val: &T, message: &str) -> Result<()> {
    val.validate().map_err(|errors| {
        tracing::debug!(%errors, "Payload validation failed");
        Error::BadRequest(message.to_string())
    })
}

/// Trims and drops empty strings, matching how the forms submit "no value".
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_blank_drops_whitespace() {
        assert_eq!(non_blank(Some("  ".into())), None);
        assert_eq!(non_blank(Some(" Go ".into())), Some("Go".into()));
        assert_eq!(non_blank(None), None);
    }
}
