pub mod media_controller;

pub use media_controller::configure;
