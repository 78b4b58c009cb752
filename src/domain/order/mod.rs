//! Order aggregate: table rental, F&B lines and timer state.

pub mod model;
pub mod repository;

pub use model::{
    merge_lines, Order, OrderDetails, OrderLine, OrderLineDetails, TablePhase, MAX_LINE_QUANTITY,
    MAX_SESSION_HOURS,
};
pub use repository::OrderRepository;
