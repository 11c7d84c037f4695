use std::sync::Arc;
use tracing::{debug, info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::error::ProductResult;
use crate::models::{CreateProduct, Product, ProductView, UpdateProduct};
use crate::repository::ProductRepository;

/// Product use cases, one unit of work per call
#[derive(Clone)]
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create a product and commit it.
    ///
    /// No duplicate detection: two identical inputs yield two products.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_product(&self, input: CreateProduct) -> ProductResult<ProductView> {
        // HTTP input arrives checked by `ValidatedJson`; other callers do not.
        input.validate()?;

        let product = Product::new(input.name, input.description, input.price, input.stock);
        let view = ProductView::from(&product);

        self.repository.add(product).await?;
        self.repository.commit().await?;

        info!(product_id = %view.id, "Product created");
        Ok(view)
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, id: Uuid) -> ProductResult<Option<ProductView>> {
        let product = self.repository.get_by_id(id).await?;
        Ok(product.map(ProductView::from))
    }

    #[instrument(skip(self))]
    pub async fn list_products(&self) -> ProductResult<Vec<ProductView>> {
        let products = self.repository.get_all().await?;
        Ok(products.into_iter().map(ProductView::from).collect())
    }

    /// Replace a product's attributes as given. Unknown ids are ignored.
    #[instrument(skip(self, input))]
    pub async fn update_product(&self, id: Uuid, input: UpdateProduct) -> ProductResult<()> {
        let Some(mut product) = self.repository.get_by_id(id).await? else {
            debug!(product_id = %id, "Update skipped, product does not exist");
            return Ok(());
        };

        product.update(input.name, input.description, input.price, input.stock);
        self.repository.mark_updated(product).await?;
        self.repository.commit().await?;

        info!(product_id = %id, "Product updated");
        Ok(())
    }

    /// Remove a product. Unknown ids are ignored, so repeated deletes are safe.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: Uuid) -> ProductResult<()> {
        let Some(product) = self.repository.get_by_id(id).await? else {
            debug!(product_id = %id, "Delete skipped, product does not exist");
            return Ok(());
        };

        self.repository.mark_deleted(product).await?;
        self.repository.commit().await?;

        info!(product_id = %id, "Product deleted");
        Ok(())
    }
}
