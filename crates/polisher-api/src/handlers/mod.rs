pub mod health;
pub mod object_storage;
pub mod root;
pub mod upload_demo;
