//! Bounded free-text inputs.

use super::ValidationError;

/// Trims `value` and checks it is non-empty and at most `max` characters.
pub fn required_text(
    field: &str,
    value: impl AsRef<str>,
    max: usize,
) -> Result<String, ValidationError> {
    let trimmed = value.as_ref().trim();
    if trimmed.is_empty() {
        return Err(ValidationError::empty_field(field));
    }
    if trimmed.chars().count() > max {
        return Err(ValidationError::too_long(field, max));
    }
    Ok(trimmed.to_string())
}

/// Like [`required_text`], but blank input becomes `None`.
pub fn optional_text(
    field: &str,
    value: Option<impl AsRef<str>>,
    max: usize,
) -> Result<Option<String>, ValidationError> {
    match value {
        Some(v) if !v.as_ref().trim().is_empty() => required_text(field, v, max).map(Some),
        _ => Ok(None),
    }
}

/// Validates a list of labels: count within `min..=max`, each a required text.
pub fn label_list(
    field: &str,
    labels: &[String],
    min: usize,
    max: usize,
    label_max: usize,
) -> Result<Vec<String>, ValidationError> {
    if labels.len() < min || labels.len() > max {
        return Err(ValidationError::wrong_count(field, min, max, labels.len()));
    }
    labels
        .iter()
        .map(|label| required_text(field, label, label_max))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_trims() {
        assert_eq!(required_text("text", "  hi  ", 10).unwrap(), "hi");
    }

    #[test]
    fn required_text_rejects_blank_and_long() {
        assert!(required_text("text", "   ", 10).is_err());
        assert!(required_text("text", "abcdef", 5).is_err());
    }

    #[test]
    fn optional_text_maps_blank_to_none() {
        assert_eq!(optional_text("title", Some(" "), 10).unwrap(), None);
        assert_eq!(optional_text("title", None::<&str>, 10).unwrap(), None);
        assert_eq!(
            optional_text("title", Some("Demo"), 10).unwrap(),
            Some("Demo".to_string())
        );
    }

    #[test]
    fn label_list_checks_count() {
        let one = vec!["a".to_string()];
        assert!(matches!(
            label_list("options", &one, 2, 10, 50),
            Err(ValidationError::WrongCount { actual: 1, .. })
        ));
    }

    #[test]
    fn label_list_rejects_blank_label() {
        let labels = vec!["a".to_string(), " ".to_string()];
        assert!(label_list("options", &labels, 2, 10, 50).is_err());
    }
}
