pub mod admin;
pub mod catalog;
pub mod order;
pub mod pages;
