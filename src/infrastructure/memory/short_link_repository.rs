//! In-process short link store.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde_json::json;

use crate::domain::entities::{NewShortLink, ShortLink};
use crate::domain::page::PageRequest;
use crate::domain::repositories::ShortLinkRepository;
use crate::error::AppError;

/// Short link repository backed by a `DashMap` keyed by short key.
///
/// The entry API makes insert-if-absent atomic per key and `get_mut` holds the
/// shard lock for the duration of a click increment, which gives the same
/// guarantees as the unique constraint and `UPDATE ... RETURNING` in
/// PostgreSQL. Data lives only as long as the process.
#[derive(Debug)]
pub struct MemoryShortLinkRepository {
    links: DashMap<String, ShortLink>,
    next_id: AtomicI64,
}

impl MemoryShortLinkRepository {
    pub fn new() -> Self {
        Self {
            links: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }

    /// Newest first, ties broken by the later id.
    fn sorted_page(mut links: Vec<ShortLink>, page: PageRequest) -> Vec<ShortLink> {
        links.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        links
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect()
    }
}

impl Default for MemoryShortLinkRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ShortLinkRepository for MemoryShortLinkRepository {
    async fn create(&self, new_link: NewShortLink) -> Result<ShortLink, AppError> {
        match self.links.entry(new_link.short_key.clone()) {
            Entry::Occupied(_) => Err(AppError::conflict(
                "Short key already exists",
                json!({ "short_key": new_link.short_key }),
            )),
            Entry::Vacant(slot) => {
                let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                let link = new_link.into_short_link(id);
                slot.insert(link.clone());
                Ok(link)
            }
        }
    }

    async fn find_by_key(&self, short_key: &str) -> Result<Option<ShortLink>, AppError> {
        Ok(self.links.get(short_key).map(|link| link.value().clone()))
    }

    async fn exists_by_key(&self, short_key: &str) -> Result<bool, AppError> {
        Ok(self.links.contains_key(short_key))
    }

    async fn increment_click_count(
        &self,
        short_key: &str,
    ) -> Result<Option<ShortLink>, AppError> {
        Ok(self.links.get_mut(short_key).map(|mut link| {
            link.click_count += 1;
            link.value().clone()
        }))
    }

    async fn list_public(&self, page: PageRequest) -> Result<Vec<ShortLink>, AppError> {
        let public = self
            .links
            .iter()
            .filter(|link| !link.is_private)
            .map(|link| link.value().clone())
            .collect();

        Ok(Self::sorted_page(public, page))
    }

    async fn count_public(&self) -> Result<i64, AppError> {
        Ok(self.links.iter().filter(|link| !link.is_private).count() as i64)
    }

    async fn list_all(&self, page: PageRequest) -> Result<Vec<ShortLink>, AppError> {
        let all = self.links.iter().map(|link| link.value().clone()).collect();

        Ok(Self::sorted_page(all, page))
    }

    async fn count_all(&self) -> Result<i64, AppError> {
        Ok(self.links.len() as i64)
    }

    async fn list_by_owner(
        &self,
        owner_id: i64,
        page: PageRequest,
    ) -> Result<Vec<ShortLink>, AppError> {
        let owned = self
            .links
            .iter()
            .filter(|link| link.owner_id() == Some(owner_id))
            .map(|link| link.value().clone())
            .collect();

        Ok(Self::sorted_page(owned, page))
    }

    async fn count_by_owner(&self, owner_id: i64) -> Result<i64, AppError> {
        Ok(self
            .links
            .iter()
            .filter(|link| link.owner_id() == Some(owner_id))
            .count() as i64)
    }

    async fn delete_by_ids_and_owner(&self, ids: &[i64], owner_id: i64) -> Result<u64, AppError> {
        let keys: Vec<String> = self
            .links
            .iter()
            .filter(|link| ids.contains(&link.id) && link.owner_id() == Some(owner_id))
            .map(|link| link.key().clone())
            .collect();

        let deleted = keys
            .iter()
            .filter(|key| {
                self.links
                    .remove_if(key.as_str(), |_, link| link.owner_id() == Some(owner_id))
                    .is_some()
            })
            .count();

        Ok(deleted as u64)
    }
}
