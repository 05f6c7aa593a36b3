use crate::domain::entities::{Avatar, NewAvatar};

#[derive(Debug, Clone, Copy, Default)]
pub struct AvatarService;

impl AvatarService {
    pub fn create_avatar(&self, image_url: String) -> NewAvatar {
        NewAvatar { image_url }
    }

    pub fn update_avatar(&self, existing: &Avatar, image_url: Option<String>) -> Avatar {
        Avatar {
            id: existing.id,
            image_url: image_url.unwrap_or_else(|| existing.image_url.clone()),
        }
    }
}
