pub mod media_service;
pub mod object_storage;

pub use media_service::{MediaService, MediaUpload};
pub use object_storage::{ObjectStorage, SupabaseStorage};
