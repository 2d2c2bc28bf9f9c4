//! Shop backend: category and user endpoints behind JWT bearer authentication
//! with role-gated access.

pub mod app;
pub mod auth;
pub mod categories;
pub mod config;
pub mod db;
pub mod error;
pub mod state;
pub mod users;

#[cfg(test)]
mod testing;
