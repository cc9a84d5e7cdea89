//! Application layer
//!
//! Use cases that turn incoming commands into calls on the domain services
//! and repositories, and shape the results into response DTOs for the
//! HTTP adapter and templates.

pub mod admin;
pub mod dashboard;
pub mod order;
