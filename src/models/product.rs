use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::Document;
use crate::error::ApiError;
use crate::types::Collection;

use super::validation::{clean_list, optional_text, FieldErrors};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub colors: Vec<String>,
    pub category: String,
    #[serde(default)]
    pub sub_category: Option<String>,
    pub seller_id: Uuid,
    #[serde(default)]
    pub image_urls: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for Product {
    const COLLECTION: Collection = Collection::Products;
    const LABEL: &'static str = "Product";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Product {
    pub fn new(seller_id: Uuid, listing: Listing) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: listing.name,
            description: listing.description,
            price: listing.price,
            stock: listing.stock,
            colors: listing.colors,
            category: listing.category,
            sub_category: listing.sub_category,
            seller_id,
            image_urls: listing.image_urls,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite every editable field with the validated listing
    pub fn apply(&mut self, listing: Listing) {
        self.name = listing.name;
        self.description = listing.description;
        self.price = listing.price;
        self.stock = listing.stock;
        self.colors = listing.colors;
        self.category = listing.category;
        self.sub_category = listing.sub_category;
        self.image_urls = listing.image_urls;
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i64>,
    pub colors: Option<Vec<String>>,
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub image_urls: Option<Vec<String>>,
}

/// A product listing that passed validation
#[derive(Debug)]
pub struct Listing {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock: u32,
    pub colors: Vec<String>,
    pub category: String,
    pub sub_category: Option<String>,
    pub image_urls: Vec<String>,
}

impl ProductRequest {
    pub fn validate(self) -> Result<Listing, ApiError> {
        let mut errors = FieldErrors::new();
        let name = errors.require_text("name", "Name", self.name);
        let description = errors.require_text("description", "Description", self.description);
        let category = errors.require_text("category", "Category", self.category);

        let price = match self.price {
            Some(p) if p.is_finite() && p >= 0.0 => p,
            Some(_) => {
                errors.add("price", "Price must be a non-negative number");
                0.0
            }
            None => {
                errors.add("price", "Price is required");
                0.0
            }
        };

        let stock = match self.stock {
            None => 0,
            Some(s) => match u32::try_from(s) {
                Ok(s) => s,
                Err(_) => {
                    errors.add("stock", "Stock must be a non-negative whole number");
                    0
                }
            },
        };

        errors.finish("Please fill all required fields")?;

        Ok(Listing {
            name,
            description,
            price,
            stock,
            colors: clean_list(self.colors),
            category,
            sub_category: optional_text(self.sub_category),
            image_urls: clean_list(self.image_urls),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ProductRequest {
        ProductRequest {
            name: Some("Walnut bowl".into()),
            description: Some("Hand turned".into()),
            price: Some(42.5),
            stock: Some(3),
            category: Some("Wood Craft".into()),
            ..Default::default()
        }
    }

    #[test]
    fn valid_listing() {
        let listing = request().validate().unwrap();
        assert_eq!(listing.stock, 3);
        assert!(listing.colors.is_empty());
    }

    #[test]
    fn negative_price_and_stock_are_rejected() {
        let err = ProductRequest {
            price: Some(-1.0),
            stock: Some(-2),
            ..request()
        }
        .validate()
        .unwrap_err();

        match err {
            ApiError::ValidationError { field_errors: Some(fields), .. } => {
                assert!(fields.contains_key("price"));
                assert!(fields.contains_key("stock"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_price_is_required() {
        let err = ProductRequest { price: None, ..request() }.validate().unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }
}
