use chrono::{DateTime, SubsecRound, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Longest accepted product name, counted in characters
pub const NAME_MAX_CHARS: usize = 100;

/// A catalog product.
///
/// `id` and `created_at` are fixed at construction. The remaining attributes
/// only change together through [`Product::update`].
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub(crate) id: Uuid,
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) price: Decimal,
    pub(crate) stock: i32,
    pub(crate) created_at: DateTime<Utc>,
}

impl Product {
    /// New product with a fresh time-ordered id.
    ///
    /// The timestamp is truncated to microseconds, the precision PostgreSQL keeps.
    pub fn new(name: impl Into<String>, description: impl Into<String>, price: Decimal, stock: i32) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            description: description.into(),
            price,
            stock,
            created_at: Utc::now().trunc_subsecs(6),
        }
    }

    /// Replace all mutable attributes in one step.
    pub fn update(&mut self, name: impl Into<String>, description: impl Into<String>, price: Decimal, stock: i32) {
        self.name = name.into();
        self.description = description.into();
        self.price = price;
        self.stock = stock;
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn stock(&self) -> i32 {
        self.stock
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::new("required").with_message(Cow::Borrowed("name required")));
    }
    if name.chars().count() > NAME_MAX_CHARS {
        return Err(ValidationError::new("length").with_message(Cow::Borrowed("name too long")));
    }
    Ok(())
}

fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if *price <= Decimal::ZERO {
        return Err(ValidationError::new("range").with_message(Cow::Borrowed("price must be positive")));
    }
    Ok(())
}

/// DTO for creating a new product
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateProduct {
    #[validate(custom(function = "validate_name"))]
    #[schema(example = "Widget", max_length = 100)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[validate(custom(function = "validate_price"))]
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    #[schema(value_type = f64, example = 9.99)]
    pub price: Decimal,
    #[validate(range(min = 0, message = "stock must be non-negative"))]
    pub stock: i32,
}

/// DTO for replacing a product's attributes
///
/// Applied as sent: only creation input is checked against the product rules.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateProduct {
    #[schema(example = "Widget")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    #[schema(value_type = f64, example = 12.5)]
    pub price: Decimal,
    pub stock: i32,
}

/// Product as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    #[schema(value_type = f64)]
    pub price: Decimal,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(name: &str, price: Decimal, stock: i32) -> CreateProduct {
        CreateProduct {
            name: name.to_string(),
            description: "d".to_string(),
            price,
            stock,
        }
    }

    fn messages(errors: &validator::ValidationErrors, field: &str) -> Vec<String> {
        errors
            .field_errors()
            .get(field)
            .map(|errs| errs.iter().filter_map(|e| e.message.as_ref().map(|m| m.to_string())).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_new_product_gets_fresh_identity() {
        let before = Utc::now().trunc_subsecs(6);
        let a = Product::new("Widget", "d", Decimal::new(999, 2), 5);
        let b = Product::new("Widget", "d", Decimal::new(999, 2), 5);
        let after = Utc::now();

        assert_ne!(a.id(), b.id());
        assert!(a.created_at() >= before && a.created_at() <= after);
        assert_eq!(a.created_at().timestamp_subsec_nanos() % 1_000, 0);
    }

    #[test]
    fn test_update_replaces_attributes_but_keeps_identity() {
        let mut product = Product::new("Widget", "d", Decimal::new(999, 2), 5);
        let (id, created_at) = (product.id(), product.created_at());

        product.update("Gadget", "new", Decimal::new(1950, 2), 0);

        assert_eq!(product.id(), id);
        assert_eq!(product.created_at(), created_at);
        assert_eq!(product.name(), "Gadget");
        assert_eq!(product.description(), "new");
        assert_eq!(product.price(), Decimal::new(1950, 2));
        assert_eq!(product.stock(), 0);
    }

    #[test]
    fn test_valid_create_passes() {
        assert!(create("Widget", Decimal::new(999, 2), 5).validate().is_ok());
        assert!(create("Widget", Decimal::new(1, 2), 0).validate().is_ok());
    }

    #[test]
    fn test_empty_name_is_required() {
        let errors = create("", Decimal::new(999, 2), 5).validate().unwrap_err();
        assert_eq!(messages(&errors, "name"), vec!["name required"]);

        let errors = create("   ", Decimal::new(999, 2), 5).validate().unwrap_err();
        assert_eq!(messages(&errors, "name"), vec!["name required"]);
    }

    #[test]
    fn test_name_length_counts_characters() {
        assert!(create(&"é".repeat(100), Decimal::ONE, 1).validate().is_ok());

        let errors = create(&"a".repeat(101), Decimal::ONE, 1).validate().unwrap_err();
        assert_eq!(messages(&errors, "name"), vec!["name too long"]);
    }

    #[test]
    fn test_price_must_be_positive() {
        for price in [Decimal::ZERO, Decimal::new(-15, 1)] {
            let errors = create("Widget", price, 1).validate().unwrap_err();
            assert_eq!(messages(&errors, "price"), vec!["price must be positive"]);
        }
    }

    #[test]
    fn test_negative_stock_rejected() {
        let errors = create("Widget", Decimal::ONE, -1).validate().unwrap_err();
        assert_eq!(messages(&errors, "stock"), vec!["stock must be non-negative"]);
    }

    #[test]
    fn test_all_violations_reported_together() {
        let errors = create("", Decimal::ZERO, -3).validate().unwrap_err();
        let fields = errors.field_errors();

        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("price"));
        assert!(fields.contains_key("stock"));
    }

    #[test]
    fn test_update_input_is_taken_as_sent() {
        let input: UpdateProduct =
            serde_json::from_str(r#"{"name":"","price":0,"stock":-2}"#).unwrap();

        assert_eq!(input.name, "");
        assert_eq!(input.description, "");
        assert_eq!(input.price, Decimal::ZERO);
        assert_eq!(input.stock, -2);
    }

    #[test]
    fn test_create_accepts_json_number_price() {
        let input: CreateProduct =
            serde_json::from_str(r#"{"name":"Widget","description":"d","price":9.99,"stock":5}"#).unwrap();
        assert_eq!(input.price, Decimal::new(999, 2));
    }

    #[test]
    fn test_view_serializes_camel_case_with_numeric_price() {
        let product = Product::new("Widget", "d", Decimal::new(999, 2), 5);
        let json = serde_json::to_value(ProductView::from(&product)).unwrap();

        assert_eq!(json["price"], serde_json::json!(9.99));
        assert!(json.get("createdAt").is_some());
        assert!(json.get("created_at").is_none());
    }

    #[test]
    fn test_price_keeps_every_digit() {
        let body = r#"{"name":"Widget","price":1.23456789012345678,"stock":1}"#;
        let input: CreateProduct = serde_json::from_str(body).unwrap();
        assert_eq!(input.price, Decimal::new(123456789012345678, 17));

        let product = Product::new(input.name, input.description, input.price, input.stock);
        let json = serde_json::to_string(&ProductView::from(&product)).unwrap();
        assert!(json.contains(r#""price":1.23456789012345678"#));
    }

    #[test]
    fn test_price_out_of_decimal_range_is_rejected() {
        let body = r#"{"name":"Widget","price":1e29,"stock":1}"#;
        assert!(serde_json::from_str::<CreateProduct>(body).is_err());
    }
}
