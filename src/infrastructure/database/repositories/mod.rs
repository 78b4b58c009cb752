//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod menu_repository;
pub mod order_repository;
pub mod pool_table_repository;
pub mod repository_provider;
pub mod user_repository;

pub use menu_repository::SeaOrmMenuItemRepository;
pub use order_repository::SeaOrmOrderRepository;
pub use pool_table_repository::SeaOrmPoolTableRepository;
pub use repository_provider::SeaOrmRepositoryProvider;
pub use user_repository::SeaOrmUserRepository;
