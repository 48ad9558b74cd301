//! Headless admin client for the orders/brands/users REST backend.
//!
//! Every screen of the admin frontend is a plain state object: list views
//! with sortable, paginated tables; create/edit forms guarded against
//! losing unsaved changes; and delete confirmations. They all talk to the
//! backend through one [`api::ApiClient`], over HTTP or the in-process
//! [`backend::MemoryBackend`].

pub mod error;
pub mod transport;
pub mod api;
pub mod domain;
pub mod forms;
pub mod navigation;
pub mod resource_framework;
pub mod resources;
pub mod views;
pub mod clients;
pub mod backend;
pub mod app_system;

#[cfg(test)]
mod mock_framework;
#[cfg(test)]
mod integration_tests;
