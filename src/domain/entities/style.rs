#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStyle {
    pub name: String,
    pub image_url: String,
}

/// Dance style grouping workouts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Style {
    pub id: i32,
    pub name: String,
    pub image_url: String,
}
