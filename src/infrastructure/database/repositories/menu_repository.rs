//! SeaORM implementation of MenuItemRepository

use async_trait::async_trait;
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::domain::{DomainError, DomainResult, MenuCategory, MenuItem, MenuItemRepository};
use crate::infrastructure::database::entities::{menu_item, order_item};

pub struct SeaOrmMenuItemRepository {
    db: DatabaseConnection,
}

impl SeaOrmMenuItemRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn category_to_entity(category: MenuCategory) -> menu_item::MenuCategory {
    match category {
        MenuCategory::Food => menu_item::MenuCategory::Food,
        MenuCategory::Beverage => menu_item::MenuCategory::Beverage,
        MenuCategory::Other => menu_item::MenuCategory::Other,
    }
}

fn category_to_domain(category: menu_item::MenuCategory) -> MenuCategory {
    match category {
        menu_item::MenuCategory::Food => MenuCategory::Food,
        menu_item::MenuCategory::Beverage => MenuCategory::Beverage,
        menu_item::MenuCategory::Other => MenuCategory::Other,
    }
}

fn model_to_domain(model: menu_item::Model) -> MenuItem {
    MenuItem {
        id: model.id,
        name: model.name,
        price: model.price,
        stock: model.stock,
        category: category_to_domain(model.category),
        image: model.image,
        active: model.active,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

#[async_trait]
impl MenuItemRepository for SeaOrmMenuItemRepository {
    async fn save(&self, item: MenuItem) -> DomainResult<()> {
        debug!("Saving menu item: {}", item.name);
        let model = menu_item::ActiveModel {
            id: Set(item.id),
            name: Set(item.name),
            price: Set(item.price),
            stock: Set(item.stock),
            category: Set(category_to_entity(item.category)),
            image: Set(item.image),
            active: Set(item.active),
            created_at: Set(item.created_at),
            updated_at: Set(item.updated_at),
        };
        model.insert(&self.db).await?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<MenuItem>> {
        let model = menu_item::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_ids(&self, ids: &[String]) -> DomainResult<Vec<MenuItem>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = menu_item::Entity::find()
            .filter(menu_item::Column::Id.is_in(ids.iter().cloned()))
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_all(&self) -> DomainResult<Vec<MenuItem>> {
        let models = menu_item::Entity::find()
            .order_by_asc(menu_item::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_sellable(&self) -> DomainResult<Vec<MenuItem>> {
        let models = menu_item::Entity::find()
            .filter(menu_item::Column::Active.eq(true))
            .filter(menu_item::Column::Stock.gt(0))
            .order_by_asc(menu_item::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn update(&self, item: MenuItem) -> DomainResult<()> {
        debug!("Updating menu item: {}", item.id);
        let existing = menu_item::Entity::find_by_id(&item.id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DomainError::not_found("MenuItem", &item.id))?;

        let mut active: menu_item::ActiveModel = existing.into();
        active.name = Set(item.name);
        active.price = Set(item.price);
        active.stock = Set(item.stock);
        active.category = Set(category_to_entity(item.category));
        active.image = Set(item.image);
        active.active = Set(item.active);
        active.updated_at = Set(item.updated_at);
        active.update(&self.db).await?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let result = menu_item::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("MenuItem", id));
        }
        Ok(())
    }

    async fn is_referenced(&self, id: &str) -> DomainResult<bool> {
        let count = order_item::Entity::find()
            .filter(order_item::Column::ItemId.eq(id))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }
}
