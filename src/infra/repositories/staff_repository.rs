use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};

use super::entities::staff::{self, ActiveModel, Entity as StaffEntity};
use crate::domain::{NewStaff, Staff};
use crate::errors::AppResult;

#[async_trait]
pub trait StaffRepository: Send + Sync {
    async fn add(&self, staff: NewStaff) -> AppResult<Staff>;

    async fn get_by_user_id(&self, user_id: i32) -> AppResult<Option<Staff>>;
}

pub struct StaffStore<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> StaffStore<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }
}

#[async_trait]
impl<'a, C: ConnectionTrait> StaffRepository for StaffStore<'a, C> {
    async fn add(&self, staff: NewStaff) -> AppResult<Staff> {
        let model = ActiveModel {
            user_id: Set(staff.user_id),
            role: Set(staff.role.into()),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(Staff::from(model))
    }

    async fn get_by_user_id(&self, user_id: i32) -> AppResult<Option<Staff>> {
        let result = StaffEntity::find()
            .filter(staff::Column::UserId.eq(user_id))
            .one(self.db)
            .await?;

        Ok(result.map(Staff::from))
    }
}
