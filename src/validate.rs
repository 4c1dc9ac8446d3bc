//! Contact form field rules and the feedback they produce.

use std::sync::OnceLock;

use regex::Regex;

/// Optional parenthesised two-digit area code, 4–5 digit prefix, optional
/// hyphen, 4 digit suffix: `(11) 91234-5678`, `1134567890`.
const PHONE_PATTERN: &str = r"^\(?[0-9]{2}\)?\s?[0-9]{4,5}-?[0-9]{4}$";

fn phone_regex() -> &'static Regex {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    PHONE.get_or_init(|| Regex::new(PHONE_PATTERN).expect("phone pattern is a valid regex"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Phone,
    Other,
}

impl FieldKind {
    /// Maps an `<input type=…>` value.
    pub fn from_input_type(ty: &str) -> Self {
        match ty.to_ascii_lowercase().as_str() {
            "text" => FieldKind::Text,
            "tel" => FieldKind::Phone,
            _ => FieldKind::Other,
        }
    }
}

pub fn validate(kind: FieldKind, value: &str) -> bool {
    match kind {
        FieldKind::Text => value.trim().chars().count() >= 2,
        FieldKind::Phone => phone_regex().is_match(value),
        FieldKind::Other => !value.trim().is_empty(),
    }
}

/// What the field should show after being checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    Valid,
    Invalid,
    /// Empty and invalid: leave the field alone so untouched inputs do not
    /// light up red.
    Untouched,
}

impl Feedback {
    pub fn of(kind: FieldKind, value: &str) -> Self {
        if validate(kind, value) {
            Feedback::Valid
        } else if value.is_empty() {
            Feedback::Untouched
        } else {
            Feedback::Invalid
        }
    }

    /// CSS class to add, and the one to remove.
    pub fn classes(self) -> Option<(&'static str, &'static str)> {
        match self {
            Feedback::Valid => Some(("field-valid", "field-invalid")),
            Feedback::Invalid => Some(("field-invalid", "field-valid")),
            Feedback::Untouched => None,
        }
    }
}
