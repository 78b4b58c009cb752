//! Food & beverage catalogue

use std::sync::Arc;

use chrono::Utc;
use log::info;

use crate::domain::{
    DomainError, DomainResult, MenuCategory, MenuItem, RepositoryProvider, MAX_MENU_PRICE, MAX_STOCK,
};

#[derive(Debug, Clone)]
pub struct MenuItemInput {
    pub name: String,
    pub price: i64,
    pub stock: i32,
    pub category: Option<MenuCategory>,
    pub image: Option<String>,
    pub active: Option<bool>,
}

pub struct MenuService {
    repos: Arc<dyn RepositoryProvider>,
}

fn clean_image(image: Option<String>) -> Option<String> {
    image
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
}

fn check_amounts(input: &MenuItemInput) -> DomainResult<()> {
    if !(1..=MAX_MENU_PRICE).contains(&input.price) {
        return Err(DomainError::Validation(format!(
            "Price must be between 1 and {}",
            MAX_MENU_PRICE
        )));
    }
    if !(0..=MAX_STOCK).contains(&input.stock) {
        return Err(DomainError::Validation(format!(
            "Stock must be between 0 and {}",
            MAX_STOCK
        )));
    }
    Ok(())
}

impl MenuService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn create(&self, input: MenuItemInput) -> DomainResult<MenuItem> {
        check_amounts(&input)?;
        let mut item = MenuItem::new(
            input.name.trim(),
            input.price,
            input.stock,
            input.category.unwrap_or_default(),
        );
        item.image = clean_image(input.image);
        item.active = input.active.unwrap_or(true);
        self.repos.menu_items().save(item.clone()).await?;
        info!("Menu item created: {} (stock {})", item.name, item.stock);
        Ok(item)
    }

    pub async fn update(&self, id: &str, input: MenuItemInput) -> DomainResult<MenuItem> {
        check_amounts(&input)?;
        let mut item = self.get(id).await?;
        item.name = input.name.trim().to_string();
        item.price = input.price;
        item.stock = input.stock;
        if let Some(category) = input.category {
            item.category = category;
        }
        item.image = clean_image(input.image);
        if let Some(active) = input.active {
            item.active = active;
        }
        item.updated_at = Utc::now();
        self.repos.menu_items().update(item.clone()).await?;
        Ok(item)
    }

    pub async fn delete(&self, id: &str) -> DomainResult<()> {
        self.get(id).await?;
        if self.repos.menu_items().is_referenced(id).await? {
            return Err(DomainError::Conflict(
                "Menu item is used by orders; deactivate it instead".into(),
            ));
        }
        self.repos.menu_items().delete(id).await
    }

    pub async fn get(&self, id: &str) -> DomainResult<MenuItem> {
        self.repos
            .menu_items()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("MenuItem", id))
    }

    pub async fn list(&self) -> DomainResult<Vec<MenuItem>> {
        self.repos.menu_items().find_all().await
    }

    /// What the order form may offer
    pub async fn available(&self) -> DomainResult<Vec<MenuItem>> {
        self.repos.menu_items().find_sellable().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::test_support::{repositories, seed_table};
    use crate::domain::{Order, OrderLine};

    fn kopi(stock: i32) -> MenuItemInput {
        MenuItemInput {
            name: "Kopi Susu".into(),
            price: 12_000,
            stock,
            category: None,
            image: Some("  ".into()),
            active: None,
        }
    }

    #[tokio::test]
    async fn create_defaults_category_and_active() {
        let svc = MenuService::new(repositories().await);
        let item = svc.create(kopi(3)).await.unwrap();
        assert_eq!(item.category, MenuCategory::Other);
        assert!(item.active);
        assert_eq!(item.image, None);
    }

    #[tokio::test]
    async fn price_and_stock_are_bounded() {
        let svc = MenuService::new(repositories().await);
        let mut pricey = kopi(1);
        pricey.price = MAX_MENU_PRICE + 1;
        assert!(matches!(
            svc.create(pricey).await.unwrap_err(),
            DomainError::Validation(_)
        ));

        let item = svc.create(kopi(1)).await.unwrap();
        let mut hoard = kopi(MAX_STOCK + 1);
        hoard.name = "Kopi Susu".into();
        assert!(matches!(
            svc.update(&item.id, hoard).await.unwrap_err(),
            DomainError::Validation(_)
        ));
        assert!(matches!(
            svc.update(&item.id, kopi(-1)).await.unwrap_err(),
            DomainError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn available_hides_sold_out_and_inactive() {
        let svc = MenuService::new(repositories().await);
        let kept = svc.create(kopi(3)).await.unwrap();
        svc.create(kopi(0)).await.unwrap();
        let mut off = kopi(5);
        off.active = Some(false);
        svc.create(off).await.unwrap();

        let available = svc.available().await.unwrap();
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].id, kept.id);
        assert_eq!(svc.list().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn referenced_item_cannot_be_deleted() {
        let repos = repositories().await;
        let svc = MenuService::new(repos.clone());
        let item = svc.create(kopi(3)).await.unwrap();
        let table = seed_table(&repos, "Meja 1", "1").await;
        repos
            .orders()
            .place(
                &Order::new(&table.id, "Andi", 1, None),
                &[OrderLine::new(&item.id, 1)],
            )
            .await
            .unwrap();

        let err = svc.delete(&item.id).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        let fresh = svc.create(kopi(1)).await.unwrap();
        svc.delete(&fresh.id).await.unwrap();
        assert!(matches!(
            svc.get(&fresh.id).await.unwrap_err(),
            DomainError::NotFound { .. }
        ));
    }
}
