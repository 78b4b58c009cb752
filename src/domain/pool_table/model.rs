//! Pool table domain entity

use chrono::{DateTime, Utc};

/// Highest hourly rent an admin may set
pub const MAX_TABLE_PRICE: i64 = 1_000_000_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableStatus {
    #[default]
    Available,
    /// A running order holds the table
    Unavailable,
}

impl TableStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Unavailable => "unavailable",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "available" => Some(Self::Available),
            "unavailable" => Some(Self::Unavailable),
            _ => None,
        }
    }
}

/// A rentable billiard table wired to one IoT light/power device.
#[derive(Debug, Clone)]
pub struct PoolTable {
    pub id: String,
    pub name: String,
    /// Hourly rent in whole currency units
    pub price: i64,
    pub device_id: String,
    pub status: TableStatus,
    /// Inactive tables are hidden from the floor view
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PoolTable {
    pub fn new(name: impl Into<String>, price: i64, device_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            price,
            device_id: device_id.into(),
            status: TableStatus::Available,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_available(&self) -> bool {
        self.status == TableStatus::Available
    }

    /// Rent for a whole number of hours
    pub fn rent_for(&self, hours: i32) -> i64 {
        self.price.saturating_mul(i64::from(hours))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_table_is_available_and_active() {
        let table = PoolTable::new("Meja 1", 30_000, "1");
        assert!(table.is_available());
        assert!(table.active);
        assert_eq!(table.rent_for(2), 60_000);
    }

    #[test]
    fn status_strings() {
        for status in [TableStatus::Available, TableStatus::Unavailable] {
            assert_eq!(TableStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(TableStatus::parse("broken"), None);
    }
}
