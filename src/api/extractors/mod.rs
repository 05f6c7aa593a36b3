//! Request extractors.

mod multipart_form;
mod validated_json;

pub use multipart_form::MultipartForm;
pub use validated_json::ValidatedJson;
