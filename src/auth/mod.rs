// Authentication module
// JWT bearer auth over a dual-table identity store (admin users + students)

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod password;
pub mod repository;
pub mod service;
pub mod token;

pub use error::AuthError;
pub use middleware::{authorize, require_admin};
pub use models::{Principal, Role};
pub use repository::{AuthRepository, IdentityStore};
pub use service::AuthService;
pub use token::TokenService;
