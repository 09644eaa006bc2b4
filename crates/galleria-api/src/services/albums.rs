use galleria_core::models::{
    AlbumResponse, CreateAlbumRequest, LinkResponse, UpdateAlbumRequest,
};
use galleria_core::AppError;
use galleria_db::{AlbumRepositoryTrait, FileRepositoryTrait};
use validator::Validate;

/// Album management and file links.
pub struct AlbumService;

impl AlbumService {
    #[tracing::instrument(skip(albums, request))]
    pub async fn create(
        albums: &dyn AlbumRepositoryTrait,
        request: CreateAlbumRequest,
    ) -> Result<AlbumResponse, AppError> {
        let request = request.normalized();
        request.validate()?;

        let album = albums
            .create(&request.name, request.description.as_deref())
            .await?;
        tracing::info!(album_id = album.id, "Album created");

        Ok(AlbumResponse {
            id: album.id,
            name: album.name,
            description: album.description,
            created_at: album.created_at,
            file_count: 0,
        })
    }

    pub async fn get(albums: &dyn AlbumRepositoryTrait, id: i64) -> Result<AlbumResponse, AppError> {
        albums
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Album {} not found", id)))
    }

    #[tracing::instrument(skip(albums, request))]
    pub async fn update(
        albums: &dyn AlbumRepositoryTrait,
        id: i64,
        request: UpdateAlbumRequest,
    ) -> Result<AlbumResponse, AppError> {
        let request = request.normalized();
        request.validate()?;

        let description = request.description.as_ref().map(|d| d.as_deref());
        albums
            .update(id, request.name.as_deref(), description)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Album {} not found", id)))
    }

    /// Remove the album and its links. Linked files stay.
    #[tracing::instrument(skip(albums))]
    pub async fn delete(albums: &dyn AlbumRepositoryTrait, id: i64) -> Result<(), AppError> {
        if albums.delete(id).await? {
            tracing::info!(album_id = id, "Album deleted");
            Ok(())
        } else {
            Err(AppError::NotFound(format!("Album {} not found", id)))
        }
    }

    /// Link a file to an album. Linking an already linked pair succeeds.
    #[tracing::instrument(skip(files, albums))]
    pub async fn link(
        files: &dyn FileRepositoryTrait,
        albums: &dyn AlbumRepositoryTrait,
        album_id: i64,
        file_id: i64,
    ) -> Result<LinkResponse, AppError> {
        Self::get(albums, album_id).await?;
        if files.get(file_id).await?.is_none() {
            return Err(AppError::NotFound(format!("File {} not found", file_id)));
        }

        let linked = albums.link(file_id, album_id).await?;
        if !linked {
            tracing::debug!(album_id, file_id, "Link already existed");
        }
        Ok(LinkResponse { linked })
    }

    #[tracing::instrument(skip(albums))]
    pub async fn unlink(
        albums: &dyn AlbumRepositoryTrait,
        album_id: i64,
        file_id: i64,
    ) -> Result<(), AppError> {
        if albums.unlink(file_id, album_id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound(format!(
                "File {} is not in album {}",
                file_id, album_id
            )))
        }
    }
}
