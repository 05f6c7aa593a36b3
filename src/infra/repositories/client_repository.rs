use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};

use super::entities::client::{self, ActiveModel, Entity as ClientEntity};
use crate::domain::{Client, NewClient};
use crate::errors::AppResult;

#[async_trait]
pub trait ClientRepository: Send + Sync {
    async fn add(&self, client: NewClient) -> AppResult<Client>;

    async fn get_by_user_id(&self, user_id: i32) -> AppResult<Option<Client>>;
}

pub struct ClientStore<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ClientStore<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }
}

#[async_trait]
impl<'a, C: ConnectionTrait> ClientRepository for ClientStore<'a, C> {
    async fn add(&self, client: NewClient) -> AppResult<Client> {
        let model = ActiveModel {
            user_id: Set(client.user_id),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(Client::from(model))
    }

    async fn get_by_user_id(&self, user_id: i32) -> AppResult<Option<Client>> {
        let result = ClientEntity::find()
            .filter(client::Column::UserId.eq(user_id))
            .one(self.db)
            .await?;

        Ok(result.map(Client::from))
    }
}
