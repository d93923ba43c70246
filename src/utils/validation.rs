use crate::error::{Error, Result};

/// Trimmed value of an optional text field, `None` when absent or blank.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Fails with a single `BadRequest` message unless every field is present
/// and non-blank.
pub fn require_all(fields: &[Option<&str>], message: &str) -> Result<()> {
    if fields.iter().all(|f| non_blank(*f).is_some()) {
        Ok(())
    } else {
        Err(Error::BadRequest(message.to_string()))
    }
}
