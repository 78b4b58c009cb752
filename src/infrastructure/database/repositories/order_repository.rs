//! SeaORM implementation of OrderRepository
//!
//! Placing an order, releasing a table and swapping F&B lines each run in
//! a single database transaction. Stock is debited with a guarded
//! `UPDATE ... WHERE stock >= qty` so two cashiers cannot oversell, and
//! order state changes are guarded the same way on `paid` / `time_out`.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    NotSet, PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::domain::{
    DomainError, DomainResult, Order, OrderDetails, OrderLine, OrderLineDetails, OrderRepository,
    TableStatus,
};
use crate::infrastructure::database::entities::{menu_item, order, order_item, pool_table, user};

use super::pool_table_repository::status_to_entity;

pub struct SeaOrmOrderRepository {
    db: DatabaseConnection,
}

impl SeaOrmOrderRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(model: order::Model) -> Order {
    Order {
        id: model.id,
        pool_table_id: model.pool_table_id,
        customer_name: model.customer_name,
        duration_hours: model.duration_hours,
        paid: model.paid,
        note: model.note,
        time_out: model.time_out,
        paused_at: model.paused_at,
        created_by: model.created_by,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Statement helpers shared by the transactional operations ────

async fn insert_lines<C: ConnectionTrait>(
    conn: &C,
    order_id: &str,
    lines: &[OrderLine],
) -> DomainResult<()> {
    for line in lines {
        let model = order_item::ActiveModel {
            id: NotSet,
            order_id: Set(order_id.to_string()),
            item_id: Set(line.item_id.clone()),
            quantity: Set(line.quantity),
        };
        model.insert(conn).await?;
    }
    Ok(())
}

async fn debit_stock<C: ConnectionTrait>(
    conn: &C,
    lines: &[OrderLine],
    now: DateTime<Utc>,
) -> DomainResult<()> {
    for line in lines {
        let result = menu_item::Entity::update_many()
            .col_expr(
                menu_item::Column::Stock,
                Expr::col(menu_item::Column::Stock).sub(line.quantity),
            )
            .col_expr(menu_item::Column::UpdatedAt, Expr::value(now))
            .filter(menu_item::Column::Id.eq(line.item_id.as_str()))
            .filter(menu_item::Column::Stock.gte(line.quantity))
            .exec(conn)
            .await?;

        if result.rows_affected == 0 {
            let name = menu_item::Entity::find_by_id(line.item_id.as_str())
                .one(conn)
                .await?
                .map(|item| item.name)
                .ok_or_else(|| DomainError::not_found("MenuItem", &line.item_id))?;
            return Err(DomainError::Conflict(format!(
                "Insufficient stock for {}",
                name
            )));
        }
    }
    Ok(())
}

async fn restore_stock<C: ConnectionTrait>(
    conn: &C,
    lines: &[order_item::Model],
    now: DateTime<Utc>,
) -> DomainResult<()> {
    for line in lines {
        menu_item::Entity::update_many()
            .col_expr(
                menu_item::Column::Stock,
                Expr::col(menu_item::Column::Stock).add(line.quantity),
            )
            .col_expr(menu_item::Column::UpdatedAt, Expr::value(now))
            .filter(menu_item::Column::Id.eq(line.item_id.as_str()))
            .exec(conn)
            .await?;
    }
    Ok(())
}

async fn set_table_status<C: ConnectionTrait>(
    conn: &C,
    table_id: &str,
    status: TableStatus,
    now: DateTime<Utc>,
) -> DomainResult<u64> {
    let mut update = pool_table::Entity::update_many()
        .col_expr(
            pool_table::Column::Status,
            Expr::value(status_to_entity(status)),
        )
        .col_expr(pool_table::Column::UpdatedAt, Expr::value(now))
        .filter(pool_table::Column::Id.eq(table_id));

    // Claiming a table only succeeds while it is free
    if status == TableStatus::Unavailable {
        update = update.filter(pool_table::Column::Status.eq(pool_table::TableStatus::Available));
    }

    Ok(update.exec(conn).await?.rows_affected)
}

impl SeaOrmOrderRepository {
    /// Join orders with their table, lines and creator in four queries
    async fn load_details(&self, models: Vec<order::Model>) -> DomainResult<Vec<OrderDetails>> {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let order_ids: Vec<String> = models.iter().map(|m| m.id.clone()).collect();
        let table_ids: Vec<String> = models.iter().map(|m| m.pool_table_id.clone()).collect();
        let creator_ids: Vec<String> = models.iter().filter_map(|m| m.created_by.clone()).collect();

        let tables: HashMap<String, pool_table::Model> = pool_table::Entity::find()
            .filter(pool_table::Column::Id.is_in(table_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|t| (t.id.clone(), t))
            .collect();

        let creators: HashMap<String, user::Model> = if creator_ids.is_empty() {
            HashMap::new()
        } else {
            user::Entity::find()
                .filter(user::Column::Id.is_in(creator_ids))
                .all(&self.db)
                .await?
                .into_iter()
                .map(|u| (u.id.clone(), u))
                .collect()
        };

        let lines = order_item::Entity::find()
            .filter(order_item::Column::OrderId.is_in(order_ids))
            .order_by_asc(order_item::Column::Id)
            .find_also_related(menu_item::Entity)
            .all(&self.db)
            .await?;

        let mut lines_by_order: HashMap<String, Vec<OrderLineDetails>> = HashMap::new();
        for (line, item) in lines {
            let Some(item) = item else {
                continue;
            };
            lines_by_order
                .entry(line.order_id.clone())
                .or_default()
                .push(OrderLineDetails {
                    item_id: line.item_id,
                    name: item.name,
                    price: item.price,
                    quantity: line.quantity,
                });
        }

        let mut details = Vec::with_capacity(models.len());
        for model in models {
            let table = tables
                .get(&model.pool_table_id)
                .ok_or_else(|| DomainError::not_found("PoolTable", &model.pool_table_id))?;
            let creator = model.created_by.as_ref().and_then(|id| creators.get(id));
            details.push(OrderDetails {
                table_name: table.name.clone(),
                table_price: table.price,
                device_id: table.device_id.clone(),
                lines: lines_by_order.remove(&model.id).unwrap_or_default(),
                creator_name: creator.map(|u| u.name.clone()),
                creator_email: creator.map(|u| u.email.clone()),
                order: model_to_domain(model),
            });
        }
        Ok(details)
    }
}

// ── OrderRepository impl ────────────────────────────────────────

#[async_trait]
impl OrderRepository for SeaOrmOrderRepository {
    async fn place(&self, order: &Order, lines: &[OrderLine]) -> DomainResult<()> {
        debug!(
            "Placing order {} on table {} ({} lines)",
            order.id,
            order.pool_table_id,
            lines.len()
        );
        let now = order.created_at;
        let txn = self.db.begin().await?;

        if set_table_status(&txn, &order.pool_table_id, TableStatus::Unavailable, now).await? == 0 {
            return Err(DomainError::Conflict("Table is in use".into()));
        }

        let model = order::ActiveModel {
            id: Set(order.id.clone()),
            pool_table_id: Set(order.pool_table_id.clone()),
            customer_name: Set(order.customer_name.clone()),
            duration_hours: Set(order.duration_hours),
            paid: Set(order.paid),
            note: Set(order.note.clone()),
            time_out: Set(order.time_out),
            paused_at: Set(order.paused_at),
            created_by: Set(order.created_by.clone()),
            created_at: Set(order.created_at),
            updated_at: Set(order.updated_at),
        };
        model.insert(&txn).await?;

        insert_lines(&txn, &order.id, lines).await?;
        debit_stock(&txn, lines, now).await?;

        txn.commit().await?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Order>> {
        let model = order::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(model_to_domain))
    }

    async fn find_details(&self, id: &str) -> DomainResult<Option<OrderDetails>> {
        let Some(model) = order::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };
        Ok(self.load_details(vec![model]).await?.into_iter().next())
    }

    async fn find_details_between(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> DomainResult<Vec<OrderDetails>> {
        let models = order::Entity::find()
            .filter(order::Column::CreatedAt.gte(from))
            .filter(order::Column::CreatedAt.lt(until))
            .order_by_desc(order::Column::CreatedAt)
            .all(&self.db)
            .await?;
        self.load_details(models).await
    }

    async fn find_all_details(&self) -> DomainResult<Vec<OrderDetails>> {
        let models = order::Entity::find()
            .order_by_asc(order::Column::CreatedAt)
            .all(&self.db)
            .await?;
        self.load_details(models).await
    }

    async fn find_running(&self) -> DomainResult<Vec<Order>> {
        let models = order::Entity::find()
            .filter(order::Column::TimeOut.eq(false))
            .order_by_asc(order::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn has_running_for_table(&self, pool_table_id: &str) -> DomainResult<bool> {
        let count = order::Entity::find()
            .filter(order::Column::PoolTableId.eq(pool_table_id))
            .filter(order::Column::TimeOut.eq(false))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn release(
        &self,
        order_id: &str,
        paused_at: Option<DateTime<Utc>>,
    ) -> DomainResult<bool> {
        let now = Utc::now();
        let txn = self.db.begin().await?;

        let existing = order::Entity::find_by_id(order_id)
            .one(&txn)
            .await?
            .ok_or_else(|| DomainError::not_found("Order", order_id))?;

        let mut update = order::Entity::update_many()
            .col_expr(order::Column::TimeOut, Expr::value(true))
            .col_expr(order::Column::UpdatedAt, Expr::value(now))
            .filter(order::Column::Id.eq(order_id))
            .filter(order::Column::TimeOut.eq(false));
        if let Some(at) = paused_at {
            update = update.col_expr(order::Column::PausedAt, Expr::value(at));
        }

        if update.exec(&txn).await?.rows_affected == 0 {
            debug!("Order {} was already released", order_id);
            return Ok(false);
        }

        set_table_status(&txn, &existing.pool_table_id, TableStatus::Available, now).await?;
        txn.commit().await?;
        Ok(true)
    }

    async fn extend(&self, order_id: &str, hours: i32, max_hours: i32) -> DomainResult<bool> {
        let result = order::Entity::update_many()
            .col_expr(
                order::Column::DurationHours,
                Expr::col(order::Column::DurationHours).add(hours),
            )
            .col_expr(order::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(order::Column::Id.eq(order_id))
            .filter(order::Column::TimeOut.eq(false))
            .filter(order::Column::DurationHours.lte(max_hours.saturating_sub(hours)))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn mark_paid(&self, order_id: &str, note: Option<&str>) -> DomainResult<bool> {
        let mut update = order::Entity::update_many()
            .col_expr(order::Column::Paid, Expr::value(true))
            .col_expr(order::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(order::Column::Id.eq(order_id))
            .filter(order::Column::Paid.eq(false));
        if let Some(note) = note {
            update = update.col_expr(order::Column::Note, Expr::value(note.to_string()));
        }

        if update.exec(&self.db).await?.rows_affected == 0 {
            debug!("Order {} was already paid", order_id);
            return Ok(false);
        }
        Ok(true)
    }

    async fn replace_lines(&self, order_id: &str, lines: &[OrderLine]) -> DomainResult<()> {
        let now = Utc::now();
        let txn = self.db.begin().await?;

        let claimed = order::Entity::update_many()
            .col_expr(order::Column::UpdatedAt, Expr::value(now))
            .filter(order::Column::Id.eq(order_id))
            .filter(order::Column::Paid.eq(false))
            .exec(&txn)
            .await?;
        if claimed.rows_affected == 0 {
            return Err(DomainError::Conflict("Order already paid".into()));
        }

        let previous = order_item::Entity::find()
            .filter(order_item::Column::OrderId.eq(order_id))
            .all(&txn)
            .await?;
        restore_stock(&txn, &previous, now).await?;

        order_item::Entity::delete_many()
            .filter(order_item::Column::OrderId.eq(order_id))
            .exec(&txn)
            .await?;

        insert_lines(&txn, order_id, lines).await?;
        debit_stock(&txn, lines, now).await?;

        txn.commit().await?;
        Ok(())
    }
}
