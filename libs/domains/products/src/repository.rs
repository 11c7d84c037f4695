use async_trait::async_trait;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::error::{ProductError, ProductResult};
use crate::models::Product;

/// Unit of work over the product table.
///
/// Reads go straight to storage. Writes are staged and only become durable on
/// [`commit`](ProductRepository::commit), which applies everything staged so far
/// as a single atomic step.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// `None` when no product has this id
    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>>;

    async fn get_all(&self) -> ProductResult<Vec<Product>>;

    /// Stage a new product
    async fn add(&self, product: Product) -> ProductResult<()>;

    /// Stage the current attributes of an existing product
    async fn mark_updated(&self, product: Product) -> ProductResult<()>;

    /// Stage removal of a product
    async fn mark_deleted(&self, product: Product) -> ProductResult<()>;

    /// Flush staged changes, returning the number of affected rows
    async fn commit(&self) -> ProductResult<u64>;
}

/// Shared storage handle that opens one repository per request.
///
/// Staged changes live in the opened repository, so concurrent requests never
/// see each other's uncommitted work.
pub trait ProductStore: Send + Sync + 'static {
    type Repository: ProductRepository + 'static;

    fn open(&self) -> Self::Repository;
}

/// A pending write held by a repository until commit
#[derive(Debug, Clone, PartialEq)]
pub enum StagedChange {
    Insert(Product),
    Update(Product),
    Delete(Uuid),
}

/// In-memory product storage (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryProductStore {
    products: Arc<RwLock<HashMap<Uuid, Product>>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of committed products
    pub async fn len(&self) -> usize {
        self.products.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.products.read().await.is_empty()
    }
}

impl ProductStore for InMemoryProductStore {
    type Repository = InMemoryProductRepository;

    fn open(&self) -> Self::Repository {
        InMemoryProductRepository {
            products: self.products.clone(),
            staged: Mutex::new(Vec::new()),
        }
    }
}

#[derive(Debug)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<HashMap<Uuid, Product>>>,
    staged: Mutex<Vec<StagedChange>>,
}

impl InMemoryProductRepository {
    async fn stage(&self, change: StagedChange) -> ProductResult<()> {
        self.staged.lock().await.push(change);
        Ok(())
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.get(&id).cloned())
    }

    async fn get_all(&self) -> ProductResult<Vec<Product>> {
        let products = self.products.read().await;
        let mut all: Vec<Product> = products.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(all)
    }

    async fn add(&self, product: Product) -> ProductResult<()> {
        self.stage(StagedChange::Insert(product)).await
    }

    async fn mark_updated(&self, product: Product) -> ProductResult<()> {
        self.stage(StagedChange::Update(product)).await
    }

    async fn mark_deleted(&self, product: Product) -> ProductResult<()> {
        self.stage(StagedChange::Delete(product.id)).await
    }

    async fn commit(&self) -> ProductResult<u64> {
        let changes = std::mem::take(&mut *self.staged.lock().await);
        if changes.is_empty() {
            return Ok(0);
        }

        let mut products = self.products.write().await;

        // Work on a copy so a rejected insert leaves the store untouched
        let mut next = products.clone();
        let mut affected = 0;
        for change in changes {
            match change {
                StagedChange::Insert(product) => match next.entry(product.id) {
                    Entry::Occupied(_) => {
                        return Err(ProductError::Persistence(format!(
                            "duplicate key value violates primary key: {}",
                            product.id
                        )));
                    }
                    Entry::Vacant(slot) => {
                        slot.insert(product);
                        affected += 1;
                    }
                },
                StagedChange::Update(product) => {
                    if let Some(existing) = next.get_mut(&product.id) {
                        existing.update(product.name, product.description, product.price, product.stock);
                        affected += 1;
                    }
                }
                StagedChange::Delete(id) => {
                    if next.remove(&id).is_some() {
                        affected += 1;
                    }
                }
            }
        }

        *products = next;
        tracing::debug!(rows_affected = affected, "Committed staged product changes");
        Ok(affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn widget() -> Product {
        Product::new("Widget", "d", Decimal::new(999, 2), 5)
    }

    #[tokio::test]
    async fn test_add_is_invisible_until_commit() {
        let store = InMemoryProductStore::new();
        let repo = store.open();
        let product = widget();

        repo.add(product.clone()).await.unwrap();
        assert!(repo.get_by_id(product.id()).await.unwrap().is_none());

        assert_eq!(repo.commit().await.unwrap(), 1);
        assert_eq!(repo.get_by_id(product.id()).await.unwrap(), Some(product));
    }

    #[tokio::test]
    async fn test_get_by_id_unknown_returns_none() {
        let repo = InMemoryProductStore::new().open();
        assert!(repo.get_by_id(Uuid::now_v7()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_staged_changes_are_private_to_a_repository() {
        let store = InMemoryProductStore::new();
        let first = store.open();
        let second = store.open();

        first.add(widget()).await.unwrap();

        assert_eq!(second.commit().await.unwrap(), 0);
        assert!(store.is_empty().await);
        assert_eq!(first.commit().await.unwrap(), 1);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_update_and_delete_count_affected_rows() {
        let store = InMemoryProductStore::new();
        let mut product = widget();
        let repo = store.open();
        repo.add(product.clone()).await.unwrap();
        repo.commit().await.unwrap();

        let repo = store.open();
        product.update("Gadget", "d2", Decimal::new(1500, 2), 1);
        repo.mark_updated(product.clone()).await.unwrap();
        assert_eq!(repo.commit().await.unwrap(), 1);
        assert_eq!(repo.get_by_id(product.id()).await.unwrap().unwrap().name(), "Gadget");

        repo.mark_deleted(product.clone()).await.unwrap();
        assert_eq!(repo.commit().await.unwrap(), 1);

        repo.mark_deleted(product).await.unwrap();
        assert_eq!(repo.commit().await.unwrap(), 0);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_update_never_changes_created_at() {
        let store = InMemoryProductStore::new();
        let original = widget();
        let repo = store.open();
        repo.add(original.clone()).await.unwrap();
        repo.commit().await.unwrap();

        let tampered = Product {
            created_at: original.created_at() - chrono::Duration::days(1),
            ..original.clone()
        };
        repo.mark_updated(tampered).await.unwrap();
        repo.commit().await.unwrap();

        let stored = repo.get_by_id(original.id()).await.unwrap().unwrap();
        assert_eq!(stored.created_at(), original.created_at());
    }

    #[tokio::test]
    async fn test_failed_commit_applies_nothing() {
        let store = InMemoryProductStore::new();
        let existing = widget();
        let repo = store.open();
        repo.add(existing.clone()).await.unwrap();
        repo.commit().await.unwrap();

        let repo = store.open();
        repo.add(widget()).await.unwrap();
        repo.add(existing).await.unwrap();

        let err = repo.commit().await.unwrap_err();
        assert!(matches!(err, ProductError::Persistence(_)));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_get_all_orders_by_creation() {
        let store = InMemoryProductStore::new();
        let repo = store.open();
        let first = widget();
        let second = widget();
        repo.add(second.clone()).await.unwrap();
        repo.add(first.clone()).await.unwrap();
        repo.commit().await.unwrap();

        let ids: Vec<Uuid> = repo.get_all().await.unwrap().iter().map(Product::id).collect();
        assert_eq!(ids, vec![first.id(), second.id()]);
    }
}
