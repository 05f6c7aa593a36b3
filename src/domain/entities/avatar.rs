#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAvatar {
    pub image_url: String,
}

/// Profile picture users may reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Avatar {
    pub id: i32,
    pub image_url: String,
}
