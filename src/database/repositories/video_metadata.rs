//! SeaORM VideoMetadata repository implementation
//!
//! Rows are keyed by the external video id and only ever written through a
//! single insert-or-update statement, so concurrent writers for the same id
//! resolve to whichever statement lands last.

use sea_orm::{DatabaseConnection, DbErr, EntityTrait, Set, sea_query::OnConflict};
use std::sync::Arc;

use crate::entities::{prelude::VideoMetadata as VideoMetadataEntity, video_metadata};
use crate::errors::AppResult;
use crate::models::VideoMetadata;

/// SeaORM-based repository for cached video metadata
#[derive(Clone)]
pub struct VideoMetadataSeaOrmRepository {
    connection: Arc<DatabaseConnection>,
}

impl VideoMetadataSeaOrmRepository {
    /// Create a new repository instance
    pub fn new(connection: Arc<DatabaseConnection>) -> Self {
        Self { connection }
    }

    /// Find the stored record for an external id
    pub async fn find_by_external_id(&self, external_id: &str) -> AppResult<Option<VideoMetadata>> {
        let model = VideoMetadataEntity::find_by_id(external_id.to_string())
            .one(&*self.connection)
            .await?;

        Ok(model.map(Self::model_to_domain))
    }

    /// Insert or replace the record for `metadata.external_id`
    pub async fn upsert(&self, metadata: &VideoMetadata) -> AppResult<()> {
        VideoMetadataEntity::insert(Self::to_active_model(metadata))
            .on_conflict(
                OnConflict::column(video_metadata::Column::ExternalId)
                    .update_columns([
                        video_metadata::Column::Title,
                        video_metadata::Column::Attribution,
                        video_metadata::Column::IsPlaceholder,
                        video_metadata::Column::FetchedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&*self.connection)
            .await?;

        Ok(())
    }

    /// Insert the record only if nothing is stored for its id yet
    ///
    /// Returns whether a row was written. Used for placeholder values, which
    /// must never replace real metadata written by a concurrent resolve.
    pub async fn insert_if_absent(&self, metadata: &VideoMetadata) -> AppResult<bool> {
        let result = VideoMetadataEntity::insert(Self::to_active_model(metadata))
            .on_conflict(
                OnConflict::column(video_metadata::Column::ExternalId)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&*self.connection)
            .await;

        match result {
            Ok(rows) => Ok(rows > 0),
            Err(DbErr::RecordNotInserted) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn to_active_model(metadata: &VideoMetadata) -> video_metadata::ActiveModel {
        video_metadata::ActiveModel {
            external_id: Set(metadata.external_id.clone()),
            title: Set(metadata.title.clone()),
            attribution: Set(metadata.attribution.clone()),
            is_placeholder: Set(metadata.is_placeholder),
            fetched_at: Set(metadata.fetched_at),
        }
    }

    fn model_to_domain(model: video_metadata::Model) -> VideoMetadata {
        VideoMetadata {
            external_id: model.external_id,
            title: model.title,
            attribution: model.attribution,
            fetched_at: model.fetched_at,
            is_placeholder: model.is_placeholder,
        }
    }
}
