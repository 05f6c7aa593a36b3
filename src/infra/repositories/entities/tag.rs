use sea_orm::entity::prelude::*;

use crate::domain::Tag;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tags")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub usages: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::workout_tag::Entity")]
    WorkoutTag,
}

impl Related<super::workout_tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WorkoutTag.def()
    }
}

impl Related<super::workout::Entity> for Entity {
    fn to() -> RelationDef {
        super::workout_tag::Relation::Workout.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::workout_tag::Relation::Tag.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Tag {
    fn from(model: Model) -> Self {
        Tag {
            id: model.id,
            name: model.name,
            usages: model.usages,
        }
    }
}
