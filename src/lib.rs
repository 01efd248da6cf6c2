pub mod api;
pub mod client;
pub mod models;
pub mod store;
pub mod webapp;
