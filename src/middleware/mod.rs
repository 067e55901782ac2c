pub mod auth;
pub mod rate_limit;
pub mod request_id;

pub use auth::{AuthSettings, ServiceRole, SessionUser};
pub use rate_limit::RateLimiter;
pub use request_id::RequestId;
