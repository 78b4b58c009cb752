//! Session Timer Service
//!
//! Ends table sessions whose paid time has run out: the order is marked
//! timed out, the table is freed and its lamp switched off.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use tokio::sync::RwLock;

use super::order::OrderService;
use crate::domain::DomainResult;
use crate::support::shutdown::ShutdownSignal;

#[derive(Debug, Clone)]
pub struct SessionTimerConfig {
    pub check_interval_secs: u64,
}

impl Default for SessionTimerConfig {
    fn default() -> Self {
        Self {
            check_interval_secs: 5,
        }
    }
}

pub struct SessionTimer {
    orders: Arc<OrderService>,
    config: SessionTimerConfig,
    running: Arc<RwLock<bool>>,
}

impl SessionTimer {
    pub fn new(orders: Arc<OrderService>) -> Self {
        Self {
            orders,
            config: SessionTimerConfig::default(),
            running: Arc::new(RwLock::new(false)),
        }
    }

    pub fn with_config(mut self, config: SessionTimerConfig) -> Self {
        self.config = config;
        self
    }

    /// Start the background sweep
    pub fn start(&self, shutdown: ShutdownSignal) {
        let orders = self.orders.clone();
        let config = self.config.clone();
        let running = self.running.clone();

        tokio::spawn(async move {
            *running.write().await = true;
            info!(
                "⏱ Session timer started (check interval: {}s)",
                config.check_interval_secs
            );

            let mut interval =
                tokio::time::interval(Duration::from_secs(config.check_interval_secs.max(1)));

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        if let Err(e) = sweep(&orders, Utc::now()).await {
                            warn!("Session sweep error: {}", e);
                        }
                    }
                    _ = shutdown.notified().wait() => {
                        info!("⏱ Session timer shutting down");
                        break;
                    }
                }
            }

            *running.write().await = false;
            info!("⏱ Session timer stopped");
        });
    }

    pub async fn is_running(&self) -> bool {
        *self.running.read().await
    }

    /// One pass at `now`; returns how many orders were expired
    pub async fn sweep(&self, now: DateTime<Utc>) -> DomainResult<usize> {
        sweep(&self.orders, now).await
    }
}

async fn sweep(orders: &OrderService, now: DateTime<Utc>) -> DomainResult<usize> {
    let overdue = orders.find_overdue(now).await?;
    if overdue.is_empty() {
        return Ok(0);
    }
    debug!("{} session(s) past their end time", overdue.len());

    let mut expired = 0;
    for order in overdue {
        match orders.expire(&order.id).await {
            Ok(_) => expired += 1,
            Err(e) => warn!("Failed to expire order {}: {}", order.id, e),
        }
    }
    Ok(expired)
}
