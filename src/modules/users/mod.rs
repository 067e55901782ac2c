// Users module: staff profiles and their paired auth identities

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{Role, User};
pub use repositories::UserRepository;
pub use services::{IdentityProvider, UserService};
