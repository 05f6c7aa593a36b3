use sea_orm::entity::prelude::*;

use crate::domain::{Level as DomainLevel, Tag, Workout};

/// Stored form of the workout level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum Level {
    #[sea_orm(string_value = "beginner")]
    Beginner,
    #[sea_orm(string_value = "intermediate")]
    Intermediate,
    #[sea_orm(string_value = "impossible")]
    Impossible,
}

impl From<DomainLevel> for Level {
    fn from(level: DomainLevel) -> Self {
        match level {
            DomainLevel::Beginner => Level::Beginner,
            DomainLevel::Intermediate => Level::Intermediate,
            DomainLevel::Impossible => Level::Impossible,
        }
    }
}

impl From<Level> for DomainLevel {
    fn from(level: Level) -> Self {
        match level {
            Level::Beginner => DomainLevel::Beginner,
            Level::Intermediate => DomainLevel::Intermediate,
            Level::Impossible => DomainLevel::Impossible,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "workouts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub calories: i32,
    pub duration: i32,
    pub level: Level,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub dance_video: String,
    pub thumbnail_image: String,
    pub author_name: String,
    pub views_count: i32,
    pub style_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::style::Entity",
        from = "Column::StyleId",
        to = "super::style::Column::Id",
        on_delete = "Cascade"
    )]
    Style,
    #[sea_orm(has_many = "super::workout_tag::Entity")]
    WorkoutTag,
}

impl Related<super::style::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Style.def()
    }
}

impl Related<super::workout_tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WorkoutTag.def()
    }
}

impl Related<super::tag::Entity> for Entity {
    fn to() -> RelationDef {
        super::workout_tag::Relation::Tag.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::workout_tag::Relation::Workout.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Convert to the domain entity, attaching already-loaded tags.
    pub fn into_workout(self, tags: Vec<Tag>) -> Workout {
        Workout {
            id: self.id,
            name: self.name,
            calories: self.calories,
            duration: self.duration,
            level: self.level.into(),
            description: self.description,
            dance_video: self.dance_video,
            thumbnail_image: self.thumbnail_image,
            author_name: self.author_name,
            views_count: self.views_count,
            style_id: self.style_id,
            tags,
        }
    }
}
