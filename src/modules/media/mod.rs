// Media module: images and videos shown on the public site

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{MediaChangeSet, MediaItem, MediaPatch};
pub use repositories::MediaRepository;
pub use services::{MediaService, ObjectStorage};
