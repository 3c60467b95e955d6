use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "video_pairs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub submitter_label: String,
    pub video_a_id: String,
    pub video_a_start: i64,
    pub video_a_end: i64,
    pub video_b_id: String,
    pub video_b_start: i64,
    pub video_b_end: i64,
    pub similar_count: i64,
    pub not_similar_count: i64,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::vote_records::Entity")]
    VoteRecords,
}

impl Related<super::vote_records::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VoteRecords.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
