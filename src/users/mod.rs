mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;

pub use dto::{LoginRequest, LoginResponse, PublicUser, RegisterRequest, UpdateUserRequest};
pub use handlers::user_routes;
pub use repo::{PgUserStore, UserStore};
pub use repo_types::{NewUser, User};
