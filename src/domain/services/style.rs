use crate::domain::entities::{NewStyle, Style};

#[derive(Debug, Clone, Copy, Default)]
pub struct StyleService;

impl StyleService {
    pub fn create_style(&self, name: String, image_url: String) -> NewStyle {
        NewStyle { name, image_url }
    }

    pub fn update_style(&self, existing: &Style, name: Option<String>, image_url: Option<String>) -> Style {
        Style {
            id: existing.id,
            name: name.unwrap_or_else(|| existing.name.clone()),
            image_url: image_url.unwrap_or_else(|| existing.image_url.clone()),
        }
    }
}
