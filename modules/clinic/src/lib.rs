//! Clinic module: owners, pets and pet types behind server-rendered forms.
//!
//! Layout follows the usual DDD-light split: `domain` holds the models,
//! the repository port and the service with the business rules; `infra`
//! holds the SeaORM adapter and migrations; `web` holds the axum layer.

pub mod domain;
pub mod infra;
pub mod web;

pub use domain::service::ClinicService;
