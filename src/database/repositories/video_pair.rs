//! SeaORM VideoPair repository implementation

use sea_orm::{ActiveModelTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use std::sync::Arc;
use uuid::Uuid;

use crate::entities::{prelude::VideoPairs, video_pairs};
use crate::errors::AppResult;
use crate::models::{VideoClip, VideoPair, VideoPairCreateRequest, VoteCounters};

/// SeaORM-based VideoPair repository
#[derive(Clone)]
pub struct VideoPairSeaOrmRepository {
    connection: Arc<DatabaseConnection>,
}

impl VideoPairSeaOrmRepository {
    /// Create a new VideoPairSeaOrmRepository
    pub fn new(connection: Arc<DatabaseConnection>) -> Self {
        Self { connection }
    }

    /// Insert a new pair with both counters at zero
    ///
    /// The request is expected to be validated already.
    pub async fn create(&self, request: VideoPairCreateRequest) -> AppResult<VideoPair> {
        let video_a = request.video_a.normalized();
        let video_b = request.video_b.normalized();

        let active_model = video_pairs::ActiveModel {
            id: Set(Uuid::new_v4()),
            submitter_label: Set(request.submitter_label.trim().to_string()),
            video_a_id: Set(video_a.external_id),
            video_a_start: Set(video_a.clip_start_seconds),
            video_a_end: Set(video_a.clip_end_seconds),
            video_b_id: Set(video_b.external_id),
            video_b_start: Set(video_b.clip_start_seconds),
            video_b_end: Set(video_b.clip_end_seconds),
            similar_count: Set(0),
            not_similar_count: Set(0),
            created_at: Set(chrono::Utc::now()),
        };

        let model = active_model.insert(&*self.connection).await?;
        Ok(Self::model_to_domain(model))
    }

    /// Find pair by ID
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<VideoPair>> {
        Self::find_by_id_on(&*self.connection, id).await
    }

    /// Find pair by ID on an explicit connection or transaction
    pub async fn find_by_id_on<C: ConnectionTrait>(conn: &C, id: Uuid) -> AppResult<Option<VideoPair>> {
        let model = VideoPairs::find_by_id(id).one(conn).await?;
        Ok(model.map(Self::model_to_domain))
    }

    /// List all pairs, newest first
    pub async fn list_all(&self) -> AppResult<Vec<VideoPair>> {
        let models = VideoPairs::find()
            .order_by_desc(video_pairs::Column::CreatedAt)
            .all(&*self.connection)
            .await?;

        Ok(models.into_iter().map(Self::model_to_domain).collect())
    }

    /// Convert SeaORM model to domain model
    pub(crate) fn model_to_domain(model: video_pairs::Model) -> VideoPair {
        VideoPair {
            id: model.id,
            submitter_label: model.submitter_label,
            video_a: VideoClip::new(model.video_a_id, model.video_a_start, model.video_a_end),
            video_b: VideoClip::new(model.video_b_id, model.video_b_start, model.video_b_end),
            created_at: model.created_at,
            counters: VoteCounters::new(model.similar_count, model.not_similar_count),
        }
    }
}
