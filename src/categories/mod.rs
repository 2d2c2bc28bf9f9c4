mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;

pub use handlers::category_routes;
pub use repo::{CategoryStore, PgCategoryStore};
pub use repo_types::Category;
