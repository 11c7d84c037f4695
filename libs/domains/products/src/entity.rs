use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::entity::prelude::*;

use crate::models::Product;

/// Row of the `products` table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub price: Decimal,
    pub stock: i32,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Product {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            price: model.price,
            stock: model.stock,
            created_at: model.created_at.to_utc(),
        }
    }
}

impl From<&Product> for ActiveModel {
    fn from(product: &Product) -> Self {
        ActiveModel {
            id: Set(product.id),
            name: Set(product.name.clone()),
            description: Set(product.description.clone()),
            price: Set(product.price),
            stock: Set(product.stock),
            created_at: Set(product.created_at.into()),
        }
    }
}

/// Only the attributes [`Product::update`] may change; identity columns stay untouched.
pub(crate) fn mutable_columns(product: &Product) -> ActiveModel {
    ActiveModel {
        id: NotSet,
        name: Set(product.name.clone()),
        description: Set(product.description.clone()),
        price: Set(product.price),
        stock: Set(product.stock),
        created_at: NotSet,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_round_trip_preserves_product() {
        let product = Product::new("Widget", "d", Decimal::new(999, 2), 5);
        let model = Model {
            id: product.id(),
            name: product.name().to_string(),
            description: product.description().to_string(),
            price: product.price(),
            stock: product.stock(),
            created_at: product.created_at().into(),
        };

        assert_eq!(Product::from(model), product);
    }

    #[test]
    fn test_mutable_columns_leave_identity_unset() {
        let product = Product::new("Widget", "d", Decimal::new(999, 2), 5);
        let active = mutable_columns(&product);

        assert!(active.id.is_not_set());
        assert!(active.created_at.is_not_set());
        assert_eq!(active.stock, Set(5));
    }
}
