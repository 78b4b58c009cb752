//! Food & beverage inventory

pub mod model;
pub mod repository;

pub use model::{MenuCategory, MenuItem, MAX_MENU_PRICE, MAX_STOCK};
pub use repository::MenuItemRepository;
