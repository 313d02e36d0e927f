//! Validated JSON extractor - Combines deserialization with validation.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::errors::AppError;

/// JSON body that has already passed its `validator` rules.
///
/// Malformed JSON and rule violations are both rejected with
/// `AppError::Validation`, i.e. 422 Unprocessable Entity.
///
/// ```rust,ignore
/// use crud_starter::api::extractors::ValidatedJson;
/// use crud_starter::domain::PostCreate;
///
/// async fn create_post(ValidatedJson(payload): ValidatedJson<PostCreate>) {
///     // payload.title is non-empty here
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;

        value
            .validate()
            .map_err(|e| AppError::validation(format_validation_errors(&e)))?;

        Ok(ValidatedJson(value))
    }
}

/// Flatten field errors into `field: message` pairs, sorted by field name.
fn format_validation_errors(errors: &validator::ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(message) => format!("{}: {}", field, message),
                None => format!("{}: invalid value", field),
            })
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PostCreate;

    #[test]
    fn test_format_validation_errors_names_fields() {
        let payload = PostCreate {
            title: String::new(),
            content: String::new(),
            user_id: 1,
        };
        let errors = payload.validate().unwrap_err();

        assert_eq!(
            format_validation_errors(&errors),
            "content: Content is required, title: Title must be 1-255 characters"
        );
    }
}
