use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;

use crate::domain::item::{CreateItem, Item, UpdateItem};
use crate::domain::repository::ItemRepository;

#[async_trait]
pub trait ItemService: Send + Sync + 'static {
    async fn list(&self) -> Result<Vec<Item>>;
    async fn create(&self, input: CreateItem) -> Result<Item>;
    async fn get(&self, id: i32) -> Result<Option<Item>>;
    async fn update(&self, id: i32, input: UpdateItem) -> Result<Option<Item>>;
}

/// Shares one repository between callers. Every call reloads from the file
/// first, since the repository only searches and numbers what it last loaded.
/// Repository work runs on the blocking pool.
pub struct ItemServiceImpl<R: ItemRepository> {
    repo: Arc<Mutex<R>>,
}

impl<R: ItemRepository> Clone for ItemServiceImpl<R> {
    fn clone(&self) -> Self { Self { repo: Arc::clone(&self.repo) } }
}

impl<R: ItemRepository> ItemServiceImpl<R> {
    pub fn new(repo: R) -> Self { Self { repo: Arc::new(Mutex::new(repo)) } }

    async fn with_repo<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut R) -> T + Send + 'static,
        T: Send + 'static,
    {
        let repo = Arc::clone(&self.repo);
        tokio::task::spawn_blocking(move || -> Result<T> {
            let mut guard = repo.lock().map_err(|_| anyhow!("item store lock poisoned"))?;
            Ok(f(&mut guard))
        })
        .await
        .context("item store task failed")?
    }
}

#[async_trait]
impl<R: ItemRepository> ItemService for ItemServiceImpl<R> {
    async fn list(&self) -> Result<Vec<Item>> { self.with_repo(|repo| repo.get_all()).await }

    async fn create(&self, input: CreateItem) -> Result<Item> {
        let mut item = Item { id: 0, text: input.text, complete: input.complete };
        self.with_repo(move |repo| {
            repo.get_all();
            repo.create(&mut item);
            item
        })
        .await
    }

    async fn get(&self, id: i32) -> Result<Option<Item>> {
        self.with_repo(move |repo| {
            repo.get_all();
            repo.get_by_id(id).cloned()
        })
        .await
    }

    async fn update(&self, id: i32, input: UpdateItem) -> Result<Option<Item>> {
        self.with_repo(move |repo| {
            repo.get_all();
            let item = repo.get_by_id_mut(id)?;
            input.apply(item);
            let updated = item.clone();
            repo.update(&updated);
            Some(updated)
        })
        .await
    }
}
