//! Card-key storefront back-office.
//!
//! Admin order lifecycle actions, dashboard aggregation and the public
//! order-status page, served with actix-web and rendered with tera.

pub mod adapters;
pub mod application;
pub mod domain;
pub mod infrastructure;
