//! Postgres persistence for the gallery: file records, albums and their links,
//! and storage accounting.

pub mod db;

pub use db::*;
