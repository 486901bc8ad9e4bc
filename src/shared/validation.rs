use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeMap;
use validator::ValidationErrors;

lazy_static! {
    /// Regex for a safe file extension taken from an uploaded filename
    /// - Valid: "jpg", "jpeg", "png", "webp"
    /// - Invalid: "", "j pg", "../x", anything longer than 8 chars
    pub static ref FILE_EXTENSION_REGEX: Regex = Regex::new(r"^[a-z0-9]{1,8}$").unwrap();
}

/// Accumulator for per-field validation messages.
///
/// Flattened to `"field: message"` strings so they fit the `errors` vector of
/// the standard `ApiResponse` envelope.
#[derive(Debug, Default)]
pub struct FieldErrors {
    errors: BTreeMap<String, Vec<String>>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_messages(self) -> Vec<String> {
        self.errors
            .into_iter()
            .flat_map(|(field, messages)| {
                messages
                    .into_iter()
                    .map(move |m| format!("{}: {}", field, m))
            })
            .collect()
    }
}

/// Flatten `validator` derive output into `"field: message"` strings
pub fn flatten_validation_errors(errors: &ValidationErrors) -> Vec<String> {
    let mut out = FieldErrors::new();
    for (field, field_errors) in errors.field_errors() {
        for err in field_errors.iter() {
            let message = err
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("invalid value ({})", err.code));
            out.add(&field, message);
        }
    }
    out.into_messages()
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Probe {
        #[validate(length(min = 10, message = "must be at least 10 characters"))]
        text: String,
    }

    #[test]
    fn test_file_extension_regex() {
        assert!(FILE_EXTENSION_REGEX.is_match("jpg"));
        assert!(FILE_EXTENSION_REGEX.is_match("jpeg"));
        assert!(FILE_EXTENSION_REGEX.is_match("png"));
        assert!(!FILE_EXTENSION_REGEX.is_match(""));
        assert!(!FILE_EXTENSION_REGEX.is_match("j pg"));
        assert!(!FILE_EXTENSION_REGEX.is_match("../x"));
        assert!(!FILE_EXTENSION_REGEX.is_match("verylongext"));
    }

    #[test]
    fn test_field_errors_flatten() {
        let mut errs = FieldErrors::new();
        errs.add("comment", "is required");
        errs.add("photo", "too large");
        errs.add("comment", "too short");
        assert!(!errs.is_empty());

        let messages = errs.into_messages();
        assert_eq!(
            messages,
            vec![
                "comment: is required".to_string(),
                "comment: too short".to_string(),
                "photo: too large".to_string(),
            ]
        );
    }

    #[test]
    fn test_flatten_validator_derive_output() {
        let probe = Probe {
            text: "short".to_string(),
        };
        let errors = probe.validate().unwrap_err();
        let messages = flatten_validation_errors(&errors);
        assert_eq!(messages, vec!["text: must be at least 10 characters"]);
    }
}
