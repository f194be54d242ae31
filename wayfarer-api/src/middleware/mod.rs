pub mod auth;
pub mod rate_limit;

pub use auth::{access_role, guarded, protect, Claims, Role};
