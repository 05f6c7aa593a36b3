//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{Email, Password, User};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub email: String,
    #[sea_orm(unique)]
    pub username: String,
    pub password: String,
    pub avatar_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::avatar::Entity",
        from = "Column::AvatarId",
        to = "super::avatar::Column::Id",
        on_delete = "SetNull"
    )]
    Avatar,
    #[sea_orm(has_one = "super::staff::Entity")]
    Staff,
    #[sea_orm(has_one = "super::client::Entity")]
    Client,
}

impl Related<super::avatar::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Avatar.def()
    }
}

impl Related<super::staff::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Staff.def()
    }
}

impl Related<super::client::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for User {
    fn from(model: Model) -> Self {
        User {
            id: model.id,
            email: Email::from_stored(model.email),
            password: Password::from_hash(model.password),
            username: model.username,
            avatar_id: model.avatar_id,
        }
    }
}
