//! Galleria Storage Library
//!
//! File bytes live in a chat on a messaging bot API, which is used purely as
//! binary storage. This crate defines the [`RemoteStore`] abstraction and the
//! bot-API-backed [`TelegramStore`].
//!
//! # Handles
//!
//! Every upload yields an opaque file handle (and, for videos, an optional
//! thumbnail handle) plus the id of the chat message carrying the file. The
//! handle resolves to bytes; the message id is what gets deleted.

pub mod telegram;
pub mod traits;

// Re-export commonly used types
pub use telegram::{TelegramConfig, TelegramStore};
pub use traits::{
    ByteStream, RemoteFile, RemoteStore, StorageError, StorageResult, StoredObject, UploadRequest,
};
