//! Tags attached to workouts.
//!
//! Usage counters are maintained by the workout use cases; this module
//! only creates, renames, lists and deletes tags.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{Tag, TagService, Workout};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::repositories::{TagFilter, TagRepository};
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSearch {
    pub filter: TagFilter,
    /// Also load the workouts of every matching tag
    pub with_workouts: bool,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait TagInteractor: Send + Sync {
    async fn create(&self, name: String) -> AppResult<Tag>;

    async fn get(&self, id: i32) -> AppResult<Tag>;

    /// Tag together with the workouts using it
    async fn detail(&self, id: i32) -> AppResult<(Tag, Vec<Workout>)>;

    /// Tags ordered by id
    async fn list(&self, params: PaginationParams) -> AppResult<Paginated<Tag>>;

    /// Tags ordered by usages, most used first
    async fn popular(&self, params: PaginationParams) -> AppResult<Paginated<Tag>>;

    /// Matching tags ordered by id. Workout lists are empty unless requested.
    async fn search(&self, search: TagSearch) -> AppResult<Vec<(Tag, Vec<Workout>)>>;

    async fn update(&self, id: i32, name: String) -> AppResult<Tag>;

    async fn delete(&self, id: i32) -> AppResult<()>;
}

pub struct TagCatalog<U: UnitOfWork> {
    uow: Arc<U>,
    tags: TagService,
}

impl<U: UnitOfWork> TagCatalog<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self {
            uow,
            tags: TagService,
        }
    }

    async fn ensure_name_free(&self, name: &str, except_id: Option<i32>) -> AppResult<()> {
        match self.uow.repos().tags().get_by_name(name).await? {
            Some(other) if Some(other.id) != except_id => Err(AppError::conflict(format!(
                "Tag with name '{}' already exists.",
                name
            ))),
            _ => Ok(()),
        }
    }
}

fn not_found(id: i32) -> String {
    format!("Tag with id {} not found", id)
}

#[async_trait]
impl<U: UnitOfWork> TagInteractor for TagCatalog<U> {
    async fn create(&self, name: String) -> AppResult<Tag> {
        let new_tag = self.tags.create_tag_entity(&name);
        if new_tag.name.is_empty() {
            return Err(AppError::validation("Tag name must not be empty"));
        }
        self.ensure_name_free(&new_tag.name, None).await?;

        let tag = self
            .uow
            .transaction(move |tx| async move { tx.repos().tags().add(new_tag).await })
            .await?;

        tracing::info!(tag_id = tag.id, name = %tag.name, "Tag created");
        Ok(tag)
    }

    async fn get(&self, id: i32) -> AppResult<Tag> {
        self.uow
            .repos()
            .tags()
            .get_by_id(id)
            .await?
            .ok_or_not_found(|| not_found(id))
    }

    async fn detail(&self, id: i32) -> AppResult<(Tag, Vec<Workout>)> {
        self.uow
            .repos()
            .tags()
            .get_with_workouts(id)
            .await?
            .ok_or_not_found(|| not_found(id))
    }

    async fn list(&self, params: PaginationParams) -> AppResult<Paginated<Tag>> {
        let (items, total) = self
            .uow
            .repos()
            .tags()
            .list_paginated(params.page(), params.page_size())
            .await?;
        Ok(Paginated::new(items, total, params))
    }

    async fn popular(&self, params: PaginationParams) -> AppResult<Paginated<Tag>> {
        let (items, total) = self
            .uow
            .repos()
            .tags()
            .list_paginated_popular(params.page(), params.page_size())
            .await?;
        Ok(Paginated::new(items, total, params))
    }

    async fn search(&self, search: TagSearch) -> AppResult<Vec<(Tag, Vec<Workout>)>> {
        let filter = &search.filter;
        if let (Some(min), Some(max)) = (filter.min_usages, filter.max_usages) {
            if min > max {
                return Err(AppError::bad_request(format!(
                    "min_usages ({}) is greater than max_usages ({})",
                    min, max
                )));
            }
        }

        let repos = self.uow.repos();
        if search.with_workouts {
            repos.tags().search_with_workouts(filter).await
        } else {
            let tags = repos.tags().search(filter).await?;
            Ok(tags.into_iter().map(|tag| (tag, Vec::new())).collect())
        }
    }

    async fn update(&self, id: i32, name: String) -> AppResult<Tag> {
        let existing = self.get(id).await?;
        let changed = self.tags.update_tag(&existing, Some(name));
        if changed.name.is_empty() {
            return Err(AppError::validation("Tag name must not be empty"));
        }
        self.ensure_name_free(&changed.name, Some(id)).await?;

        let tag = self
            .uow
            .transaction(move |tx| async move { tx.repos().tags().update(&changed).await })
            .await?;

        tracing::info!(tag_id = id, name = %tag.name, "Tag renamed");
        Ok(tag)
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        self.get(id).await?;

        self.uow
            .transaction(move |tx| async move { tx.repos().tags().delete(id).await })
            .await?;

        tracing::info!(tag_id = id, "Tag deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::Persistence;
    use crate::interactors::testing;

    async fn catalog() -> TagCatalog<Persistence> {
        TagCatalog::new(testing::persistence().await)
    }

    #[tokio::test]
    async fn test_create_trims_and_starts_unused() {
        let catalog = catalog().await;

        let tag = catalog.create("  cardio ".to_string()).await.unwrap();

        assert_eq!(tag.name, "cardio");
        assert_eq!(tag.usages, 0);
    }

    #[tokio::test]
    async fn test_create_duplicate_is_conflict() {
        let catalog = catalog().await;
        catalog.create("cardio".to_string()).await.unwrap();

        let result = catalog.create("cardio".to_string()).await;
        assert!(matches!(result, Err(AppError::DataConflict(_))));
    }

    #[tokio::test]
    async fn test_rename_rules() {
        let catalog = catalog().await;
        let cardio = catalog.create("cardio".to_string()).await.unwrap();
        catalog.create("hiit".to_string()).await.unwrap();

        let taken = catalog.update(cardio.id, "hiit".to_string()).await;
        assert!(matches!(taken, Err(AppError::DataConflict(_))));

        let renamed = catalog.update(cardio.id, "stretch".to_string()).await.unwrap();
        assert_eq!(renamed.name, "stretch");
        assert_eq!(renamed.id, cardio.id);

        let missing = catalog.update(999, "yoga".to_string()).await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_pages_report_total() {
        let catalog = catalog().await;
        for name in ["a", "b", "c", "d", "e"] {
            catalog.create(name.to_string()).await.unwrap();
        }

        let page = catalog.list(PaginationParams::new(2, 2)).await.unwrap();

        let names: Vec<_> = page.items.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["c", "d"]);
        assert_eq!(page.total_count, 5);
        assert_eq!(page.page, 2);
        assert_eq!(page.page_size, 2);
    }

    #[tokio::test]
    async fn test_search_by_name_is_case_insensitive() {
        let catalog = catalog().await;
        catalog.create("Cardio".to_string()).await.unwrap();
        catalog.create("strength".to_string()).await.unwrap();

        let found = catalog
            .search(TagSearch {
                filter: TagFilter {
                    name: Some("CARD".to_string()),
                    ..Default::default()
                },
                with_workouts: false,
            })
            .await
            .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].0.name, "Cardio");
        assert!(found[0].1.is_empty());
    }

    #[tokio::test]
    async fn test_search_rejects_inverted_range() {
        let catalog = catalog().await;

        let result = catalog
            .search(TagSearch {
                filter: TagFilter {
                    min_usages: Some(5),
                    max_usages: Some(1),
                    ..Default::default()
                },
                with_workouts: false,
            })
            .await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_delete() {
        let catalog = catalog().await;
        let tag = catalog.create("gone".to_string()).await.unwrap();

        catalog.delete(tag.id).await.unwrap();

        assert!(matches!(catalog.get(tag.id).await, Err(AppError::NotFound(_))));
        assert!(matches!(catalog.delete(tag.id).await, Err(AppError::NotFound(_))));
    }
}
