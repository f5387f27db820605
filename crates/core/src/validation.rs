//! Shared helpers for client-side form guards.
//!
//! Forms derive [`validator::Validate`]; [`validate_form`] flattens the
//! resulting error map into a single user-facing [`CoreError::Validation`]
//! so a rejected submit never reaches the network.

use validator::Validate;

use crate::error::CoreError;

/// Run `validator` rules on a form and collapse failures into one message.
///
/// Messages are ordered by field name so the output is stable.
pub fn validate_form<T: Validate>(form: &T) -> Result<(), CoreError> {
    let Err(errors) = form.validate() else {
        return Ok(());
    };

    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    let messages: Vec<String> = fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(msg) => msg.to_string(),
                None => format!("{field} is invalid"),
            })
        })
        .collect();

    Err(CoreError::Validation(messages.join("; ")))
}

/// Reject strings that are empty after trimming.
pub fn require_non_blank(value: &str, label: &str) -> Result<String, CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("{label} is required")));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "Name is required"))]
        name: String,
        #[validate(range(max = 10))]
        count: u32,
    }

    #[test]
    fn valid_form_passes() {
        let s = Sample {
            name: "a".into(),
            count: 1,
        };
        assert!(validate_form(&s).is_ok());
    }

    #[test]
    fn messages_are_joined_in_field_order() {
        let s = Sample {
            name: String::new(),
            count: 11,
        };
        let err = validate_form(&s).unwrap_err();
        assert_eq!(
            err,
            CoreError::Validation("count is invalid; Name is required".into())
        );
    }

    #[test]
    fn blank_value_rejected() {
        assert!(require_non_blank("  \t", "Display name").is_err());
        assert_eq!(require_non_blank(" Ada ", "Display name").unwrap(), "Ada");
    }
}
