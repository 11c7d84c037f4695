use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    entity,
    error::ProductResult,
    models::Product,
    repository::{ProductRepository, ProductStore, StagedChange},
};

/// PostgreSQL product storage sharing one connection pool
#[derive(Clone, Debug)]
pub struct PgProductStore {
    db: DatabaseConnection,
}

impl PgProductStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl ProductStore for PgProductStore {
    type Repository = PgProductRepository;

    fn open(&self) -> Self::Repository {
        PgProductRepository::new(self.db.clone())
    }
}

pub struct PgProductRepository {
    db: DatabaseConnection,
    staged: Mutex<Vec<StagedChange>>,
}

impl PgProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            staged: Mutex::new(Vec::new()),
        }
    }

    async fn stage(&self, change: StagedChange) -> ProductResult<()> {
        self.staged.lock().await.push(change);
        Ok(())
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>> {
        let model = entity::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Into::into))
    }

    async fn get_all(&self) -> ProductResult<Vec<Product>> {
        let models = entity::Entity::find()
            .order_by_asc(entity::Column::CreatedAt)
            .order_by_asc(entity::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn add(&self, product: Product) -> ProductResult<()> {
        self.stage(StagedChange::Insert(product)).await
    }

    async fn mark_updated(&self, product: Product) -> ProductResult<()> {
        self.stage(StagedChange::Update(product)).await
    }

    async fn mark_deleted(&self, product: Product) -> ProductResult<()> {
        self.stage(StagedChange::Delete(product.id())).await
    }

    async fn commit(&self) -> ProductResult<u64> {
        let changes = std::mem::take(&mut *self.staged.lock().await);
        if changes.is_empty() {
            return Ok(0);
        }

        // Dropping the transaction on an early return rolls it back
        let txn = self.db.begin().await?;
        let mut affected = 0;

        for change in &changes {
            affected += match change {
                StagedChange::Insert(product) => {
                    entity::Entity::insert(entity::ActiveModel::from(product))
                        .exec_without_returning(&txn)
                        .await?
                }
                StagedChange::Update(product) => {
                    entity::Entity::update_many()
                        .set(entity::mutable_columns(product))
                        .filter(entity::Column::Id.eq(product.id()))
                        .exec(&txn)
                        .await?
                        .rows_affected
                }
                StagedChange::Delete(id) => {
                    entity::Entity::delete_by_id(*id)
                        .exec(&txn)
                        .await?
                        .rows_affected
                }
            };
        }

        txn.commit().await?;

        tracing::info!(
            staged = changes.len(),
            rows_affected = affected,
            "Committed product changes"
        );
        Ok(affected)
    }
}
