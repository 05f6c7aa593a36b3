#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTag {
    pub name: String,
}

/// Label attached to workouts. `usages` counts the workouts currently
/// carrying it and never drops below zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub id: i32,
    pub name: String,
    pub usages: i32,
}
