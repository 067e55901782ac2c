pub mod user;

pub use user::{CreateUserRequest, NewUser, Role, UpdateUserRequest, User, UserProfile};
