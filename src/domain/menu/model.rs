//! Menu item (F&B) domain entity

use chrono::{DateTime, Utc};

pub const MAX_MENU_PRICE: i64 = 1_000_000_000_000;
pub const MAX_STOCK: i32 = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MenuCategory {
    Food,
    Beverage,
    #[default]
    Other,
}

impl MenuCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Beverage => "beverage",
            Self::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "food" => Some(Self::Food),
            "beverage" => Some(Self::Beverage),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    pub price: i64,
    pub stock: i32,
    pub category: MenuCategory,
    pub image: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MenuItem {
    pub fn new(name: impl Into<String>, price: i64, stock: i32, category: MenuCategory) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            price,
            stock,
            category,
            image: None,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Shown on the order form
    pub fn is_sellable(&self) -> bool {
        self.active && self.stock > 0
    }

    pub fn has_stock_for(&self, quantity: i32) -> bool {
        self.stock >= quantity
    }
}
