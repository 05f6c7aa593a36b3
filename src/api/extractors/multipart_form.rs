//! Multipart form extractor for endpoints that take an image.
//!
//! The whole form is buffered. Text fields may repeat (e.g. `tags`); file
//! fields are kept by name.

use std::collections::HashMap;
use std::str::FromStr;

use axum::{
    async_trait,
    extract::{multipart::MultipartError, FromRequest, Multipart, Request},
    http::StatusCode,
};

use crate::errors::{AppError, AppResult};
use crate::interactors::ImageFile;

#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, Vec<String>>,
    files: HashMap<String, ImageFile>,
}

fn multipart_error(err: MultipartError) -> AppError {
    match err.status() {
        StatusCode::PAYLOAD_TOO_LARGE => AppError::PayloadTooLarge,
        _ => AppError::bad_request(err.body_text()),
    }
}

#[async_trait]
impl<S> FromRequest<S> for MultipartForm
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| AppError::bad_request(e.body_text()))?;

        let mut form = MultipartForm::default();
        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            match field.file_name().map(str::to_string) {
                Some(filename) => {
                    let content = field.bytes().await.map_err(multipart_error)?;
                    if !content.is_empty() {
                        form.files
                            .insert(name, ImageFile::new(content.to_vec(), filename));
                    }
                }
                None => {
                    let value = field.text().await.map_err(multipart_error)?;
                    form.fields.entry(name).or_default().push(value);
                }
            }
        }

        Ok(form)
    }
}

impl MultipartForm {
    /// First value of a text field, trimmed; blank values count as absent.
    pub fn text(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .and_then(|values| values.first())
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    pub fn required_text(&self, name: &str) -> AppResult<String> {
        self.text(name)
            .ok_or_else(|| AppError::validation(format!("{} is required", name)))
    }

    /// Parse an optional text field.
    pub fn parse<T: FromStr>(&self, name: &str) -> AppResult<Option<T>> {
        self.text(name)
            .map(|value| {
                value
                    .parse()
                    .map_err(|_| AppError::validation(format!("{} is invalid", name)))
            })
            .transpose()
    }

    pub fn required<T: FromStr>(&self, name: &str) -> AppResult<T> {
        self.parse(name)?
            .ok_or_else(|| AppError::validation(format!("{} is required", name)))
    }

    /// Every value of a repeated field; comma separated values are split.
    pub fn list(&self, name: &str) -> Vec<String> {
        self.fields
            .get(name)
            .into_iter()
            .flatten()
            .flat_map(|value| value.split(','))
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn take_file(&mut self, name: &str) -> Option<ImageFile> {
        self.files.remove(name)
    }

    pub fn required_file(&mut self, name: &str) -> AppResult<ImageFile> {
        self.take_file(name)
            .ok_or_else(|| AppError::validation(format!("{} file is required", name)))
    }

    #[cfg(test)]
    fn with_field(mut self, name: &str, value: &str) -> Self {
        self.fields
            .entry(name.to_string())
            .or_default()
            .push(value.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_fields() {
        let form = MultipartForm::default()
            .with_field("name", "  Hip-Hop ")
            .with_field("blank", "   ")
            .with_field("calories", "350")
            .with_field("duration", "soon");

        assert_eq!(form.text("name").as_deref(), Some("Hip-Hop"));
        assert_eq!(form.text("blank"), None);
        assert_eq!(form.required::<i32>("calories").unwrap(), 350);
        assert!(matches!(
            form.required::<i32>("duration"),
            Err(AppError::Validation(_))
        ));
        assert_eq!(form.parse::<i32>("missing").unwrap(), None);
        assert!(form.required_text("missing").is_err());
    }

    #[test]
    fn test_list_accepts_repeated_and_comma_separated() {
        let form = MultipartForm::default()
            .with_field("tags", "cardio, hiit")
            .with_field("tags", "core")
            .with_field("tags", " ");

        assert_eq!(form.list("tags"), vec!["cardio", "hiit", "core"]);
        assert!(form.list("other").is_empty());
    }

    #[test]
    fn test_missing_file() {
        let mut form = MultipartForm::default();
        assert!(form.take_file("image").is_none());
        assert!(matches!(
            form.required_file("image"),
            Err(AppError::Validation(_))
        ));
    }
}
