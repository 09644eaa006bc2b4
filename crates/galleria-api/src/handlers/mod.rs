pub mod albums;
pub mod download;
pub mod files;
pub mod registration;
pub mod storage;
pub mod trash;
pub mod upload;
