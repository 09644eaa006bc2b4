//! Domain route groups (files, trash, albums, transfer, storage).

use crate::constants::API_PREFIX;
use crate::handlers;
use crate::state::AppState;
use axum::routing::{delete, get, post};
use axum::Router;
use std::sync::Arc;

pub fn file_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(&format!("{}/files", API_PREFIX), get(handlers::files::list_files))
        .route(
            &format!("{}/files/trash", API_PREFIX),
            get(handlers::files::list_trash).post(handlers::trash::trash_files),
        )
        .route(
            &format!("{}/files/{{id}}", API_PREFIX),
            get(handlers::files::get_file)
                .patch(handlers::files::update_file)
                .delete(handlers::trash::trash_file),
        )
        .route(
            &format!("{}/files/{{id}}/restore", API_PREFIX),
            post(handlers::trash::restore_file),
        )
        .route(
            &format!("{}/files/{{id}}/permanent", API_PREFIX),
            delete(handlers::trash::purge_file),
        )
        .route(
            &format!("{}/files/{{id}}/hard", API_PREFIX),
            delete(handlers::trash::hard_delete_file),
        )
        .route(&format!("{}/trash", API_PREFIX), delete(handlers::trash::empty_trash))
        .with_state(state)
}

pub fn album_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/albums", API_PREFIX),
            get(handlers::albums::list_albums).post(handlers::albums::create_album),
        )
        .route(
            &format!("{}/albums/{{id}}", API_PREFIX),
            get(handlers::albums::get_album)
                .patch(handlers::albums::update_album)
                .delete(handlers::albums::delete_album),
        )
        .route(
            &format!("{}/albums/{{id}}/files", API_PREFIX),
            post(handlers::albums::link_file),
        )
        .route(
            &format!("{}/albums/{{id}}/files/{{file_id}}", API_PREFIX),
            delete(handlers::albums::unlink_file),
        )
        .with_state(state)
}

pub fn upload_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(&format!("{}/upload", API_PREFIX), post(handlers::upload::upload_file))
        .with_state(state)
}

pub fn download_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/download/{{file_handle}}", API_PREFIX),
            get(handlers::download::download_file),
        )
        .with_state(state)
}

pub fn storage_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(&format!("{}/storage", API_PREFIX), get(handlers::storage::storage_summary))
        .with_state(state)
}
