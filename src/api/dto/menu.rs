//! Food & beverage DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::MenuItemInput;
use crate::domain::{DomainError, DomainResult, MenuCategory, MenuItem};

#[derive(Debug, Serialize, ToSchema)]
pub struct MenuItemDto {
    pub id: String,
    pub name: String,
    pub price: i64,
    pub stock: i32,
    /// `food`, `beverage` or `other`
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<MenuItem> for MenuItemDto {
    fn from(m: MenuItem) -> Self {
        Self {
            id: m.id,
            name: m.name,
            price: m.price,
            stock: m.stock,
            category: m.category.as_str().to_string(),
            image: m.image,
            active: m.active,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "name": "Es Teh Manis",
    "price": 8000,
    "stock": 40,
    "category": "beverage"
}))]
pub struct MenuItemRequest {
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub name: String,
    #[validate(range(min = 1, max = 1000000000000i64, message = "must be between 1 and 1000000000000"))]
    pub price: i64,
    #[validate(range(min = 0, max = 1000000, message = "must be between 0 and 1000000"))]
    pub stock: i32,
    /// `food`, `beverage` or `other`. Defaults to `other`
    pub category: Option<String>,
    /// Picture URL shown on the order form
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub image: Option<String>,
    /// Defaults to `true`
    pub active: Option<bool>,
}

impl MenuItemRequest {
    pub fn into_input(self) -> DomainResult<MenuItemInput> {
        let category = match self.category.as_deref() {
            None => None,
            Some(raw) => Some(MenuCategory::parse(raw).ok_or_else(|| {
                DomainError::Validation(format!("Unknown menu category '{}'", raw))
            })?),
        };
        Ok(MenuItemInput {
            name: self.name,
            price: self.price,
            stock: self.stock,
            category,
            image: self.image,
            active: self.active,
        })
    }
}
