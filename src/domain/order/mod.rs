pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
pub mod value_objects;

pub use entities::{Card, Order, RefundRequest};
pub use errors::OrderError;
pub use ports::{OrderListFilter, OrderRepository, OrderUnitOfWork};
pub use services::{DeleteOrdersOutcome, OrderService};
pub use value_objects::{OrderAction, OrderId, OrderStatus, ValueObjectError};
