use galleria_core::models::StorageSummary;
use galleria_core::AppError;
use galleria_db::StorageMetricsRepositoryTrait;

/// Storage usage across the remote store and the metadata database.
pub struct AccountingService;

impl AccountingService {
    #[tracing::instrument(skip(metrics))]
    pub async fn summary(
        metrics: &dyn StorageMetricsRepositoryTrait,
    ) -> Result<StorageSummary, AppError> {
        let totals = metrics.file_totals().await?;
        let database_bytes = metrics.database_size().await?;
        Ok(StorageSummary::new(totals, database_bytes))
    }
}
