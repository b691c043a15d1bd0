pub mod error;
pub mod forms;
pub mod handlers;
pub mod routes;
pub mod views;
