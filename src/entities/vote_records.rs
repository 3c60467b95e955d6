use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vote_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub pair_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub voter_token: String,
    pub choice: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::video_pairs::Entity",
        from = "Column::PairId",
        to = "super::video_pairs::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    VideoPairs,
}

impl Related<super::video_pairs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VideoPairs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
