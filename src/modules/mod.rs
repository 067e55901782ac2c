pub mod catalog;
pub mod health;
pub mod loans;
pub mod media;
pub mod reports;
pub mod sales;
pub mod users;
