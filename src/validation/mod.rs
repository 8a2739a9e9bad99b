// Request payload validation
//
// Request DTOs carry declarative rules via `validator` derive attributes;
// `validate()` applies them and maps failures onto the API error taxonomy
// with one message per violated field.
use std::collections::HashMap;

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::Json;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::error::ApiError;

/// Maximum accepted money amount, mirroring the product price bound.
const MAX_AMOUNT: i64 = 1_000_000_000;

/// Apply a request's declarative rule set.
///
/// No side effects; fails with a 400 `ValidationError` carrying one message
/// per violated field. Nested fields are reported as `parent[i].field`.
pub fn validate<T: Validate>(request: &T) -> Result<(), ApiError> {
    request.validate().map_err(|errors| {
        let mut fields = HashMap::new();
        collect_field_errors("", &errors, &mut fields);
        ApiError::validation_error("Validation failed", Some(fields))
    })
}

fn collect_field_errors(
    prefix: &str,
    errors: &ValidationErrors,
    out: &mut HashMap<String, String>,
) {
    for (field, kind) in errors.errors() {
        let name = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };
        match kind {
            ValidationErrorsKind::Field(violations) => {
                if let Some(violation) = violations.first() {
                    let message = violation
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| violation.code.to_string());
                    out.insert(name, message);
                }
            }
            ValidationErrorsKind::Struct(inner) => collect_field_errors(&name, inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_field_errors(&format!("{}[{}]", name, index), inner, out);
                }
            }
        }
    }
}

/// Password strength: at least one digit, one lowercase, one uppercase and
/// one special character, and no whitespace anywhere.
pub fn password_strength(password: &str) -> Result<(), ValidationError> {
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_lower = password.chars().any(|c| c.is_lowercase());
    let has_upper = password.chars().any(|c| c.is_uppercase());
    let has_special = password.chars().any(|c| !c.is_alphanumeric());
    let has_whitespace = password.chars().any(|c| c.is_whitespace());

    if has_digit && has_lower && has_upper && has_special && !has_whitespace {
        Ok(())
    } else {
        let mut error = ValidationError::new("password_strength");
        error.message = Some(
            "password must contain a digit, a lowercase letter, an uppercase letter and a special character, with no whitespace"
                .into(),
        );
        Err(error)
    }
}

/// Phone numbers: digits plus the usual separators, at least one digit.
pub fn phone_format(phone: &str) -> Result<(), ValidationError> {
    let valid_chars = phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')'));
    let has_digit = phone.chars().any(|c| c.is_ascii_digit());

    if valid_chars && has_digit {
        Ok(())
    } else {
        let mut error = ValidationError::new("phone_format");
        error.message = Some("phone must contain only digits and +, -, (, )".into());
        Err(error)
    }
}

/// Money amounts: strictly positive, bounded.
pub fn positive_amount(amount: &Decimal) -> Result<(), ValidationError> {
    if amount > &Decimal::ZERO && amount <= &Decimal::from(MAX_AMOUNT) {
        Ok(())
    } else {
        let mut error = ValidationError::new("positive_amount");
        error.message = Some(format!("must be positive and at most {}", MAX_AMOUNT).into());
        Err(error)
    }
}

/// Order dates may not lie in the future.
pub fn not_in_future(date: &DateTime<Utc>) -> Result<(), ValidationError> {
    if date <= &Utc::now() {
        Ok(())
    } else {
        let mut error = ValidationError::new("not_in_future");
        error.message = Some("date must not be in the future".into());
        Err(error)
    }
}

/// JSON body extractor whose rejection speaks the `{ "errors": ... }` envelope
/// instead of axum's plain-text default.
pub struct ValidJson<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for ValidJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ValidJson(value)),
            Err(rejection) => Err(ApiError::invalid_json(rejection.body_text())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 3, max = 10, message = "name must be 3-10 characters"))]
        name: String,
        #[validate(custom(function = crate::validation::password_strength))]
        password: String,
    }

    #[test]
    fn violations_map_to_one_message_per_field() {
        let sample = Sample {
            name: "ab".to_string(),
            password: "weak".to_string(),
        };
        let err = validate(&sample).unwrap_err();
        let body = err.to_json();
        assert_eq!(body["errors"]["name"], "name must be 3-10 characters");
        assert!(body["errors"]["password"]
            .as_str()
            .unwrap()
            .contains("digit"));
    }

    #[test]
    fn valid_payload_passes() {
        let sample = Sample {
            name: "widget".to_string(),
            password: "Str0ng!pass".to_string(),
        };
        assert!(validate(&sample).is_ok());
    }

    #[test]
    fn password_strength_requires_all_classes() {
        assert!(password_strength("Str0ng!pass").is_ok());
        assert!(password_strength("nodigits!A").is_err());
        assert!(password_strength("NOLOWER1!").is_err());
        assert!(password_strength("noupper1!").is_err());
        assert!(password_strength("NoSpecial1").is_err());
        assert!(password_strength("With space1!A").is_err());
    }

    #[test]
    fn phone_format_accepts_separators_only_with_digits() {
        assert!(phone_format("+62 812-3456-789").is_ok());
        assert!(phone_format("(021) 555 0123").is_ok());
        assert!(phone_format("not a phone").is_err());
        assert!(phone_format("+-()").is_err());
    }

    #[test]
    fn positive_amount_bounds() {
        assert!(positive_amount(&Decimal::new(1999, 2)).is_ok());
        assert!(positive_amount(&Decimal::ZERO).is_err());
        assert!(positive_amount(&Decimal::from(-5)).is_err());
        assert!(positive_amount(&Decimal::from(MAX_AMOUNT + 1)).is_err());
    }

    #[test]
    fn order_dates_must_not_be_in_future() {
        let past = Utc::now() - chrono::Duration::days(1);
        let future = Utc::now() + chrono::Duration::days(1);
        assert!(not_in_future(&past).is_ok());
        assert!(not_in_future(&future).is_err());
    }
}
