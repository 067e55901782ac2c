pub mod identity_provider;
pub mod user_service;

pub use identity_provider::{IdentityProvider, SupabaseIdentityProvider};
pub use user_service::{ProvisionedUser, UserService};
