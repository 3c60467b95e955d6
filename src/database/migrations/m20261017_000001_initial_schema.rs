//! Initial schema: video pairs, cached video metadata and vote records

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(VideoPairs::Table)
                    .if_not_exists()
                    .col(Self::create_id_column(manager, VideoPairs::Id))
                    .col(ColumnDef::new(VideoPairs::SubmitterLabel).string().not_null())
                    .col(ColumnDef::new(VideoPairs::VideoAId).string().not_null())
                    .col(ColumnDef::new(VideoPairs::VideoAStart).big_integer().not_null())
                    .col(ColumnDef::new(VideoPairs::VideoAEnd).big_integer().not_null())
                    .col(ColumnDef::new(VideoPairs::VideoBId).string().not_null())
                    .col(ColumnDef::new(VideoPairs::VideoBStart).big_integer().not_null())
                    .col(ColumnDef::new(VideoPairs::VideoBEnd).big_integer().not_null())
                    .col(
                        ColumnDef::new(VideoPairs::SimilarCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(VideoPairs::NotSimilarCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(Self::create_timestamp_column(manager, VideoPairs::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_video_pairs_created_at")
                    .table(VideoPairs::Table)
                    .col(VideoPairs::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(VideoMetadata::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VideoMetadata::ExternalId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(VideoMetadata::Title).string().not_null())
                    .col(ColumnDef::new(VideoMetadata::Attribution).string().not_null())
                    .col(
                        ColumnDef::new(VideoMetadata::IsPlaceholder)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(Self::create_timestamp_column(manager, VideoMetadata::FetchedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(VoteRecords::Table)
                    .if_not_exists()
                    .col(Self::create_uuid_fk_column(manager, VoteRecords::PairId))
                    .col(ColumnDef::new(VoteRecords::VoterToken).string().not_null())
                    .col(ColumnDef::new(VoteRecords::Choice).string().not_null())
                    .col(Self::create_timestamp_column(manager, VoteRecords::CreatedAt))
                    .col(Self::create_timestamp_column(manager, VoteRecords::UpdatedAt))
                    .primary_key(
                        Index::create()
                            .name("pk_vote_records")
                            .col(VoteRecords::PairId)
                            .col(VoteRecords::VoterToken),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vote_records_pair_id")
                            .from(VoteRecords::Table, VoteRecords::PairId)
                            .to(VideoPairs::Table, VideoPairs::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_vote_records_pair_id")
                    .table(VoteRecords::Table)
                    .col(VoteRecords::PairId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(VoteRecords::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(VideoMetadata::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(VideoPairs::Table).to_owned())
            .await
    }
}

impl Migration {
    /// Create ID column with optimal type for each database
    fn create_id_column(
        manager: &SchemaManager<'_>,
        column_name: impl sea_orm::Iden + 'static,
    ) -> ColumnDef {
        match manager.get_database_backend() {
            sea_orm::DatabaseBackend::Postgres => ColumnDef::new(column_name)
                .uuid()
                .not_null()
                .primary_key()
                .to_owned(),
            _ => ColumnDef::new(column_name)
                .string()
                .not_null()
                .primary_key()
                .to_owned(),
        }
    }

    /// Create UUID foreign key column with optimal type for each database
    fn create_uuid_fk_column(
        manager: &SchemaManager<'_>,
        column_name: impl sea_orm::Iden + 'static,
    ) -> ColumnDef {
        match manager.get_database_backend() {
            sea_orm::DatabaseBackend::Postgres => {
                ColumnDef::new(column_name).uuid().not_null().to_owned()
            }
            _ => ColumnDef::new(column_name).string().not_null().to_owned(),
        }
    }

    /// Create timestamp column with database-specific types
    fn create_timestamp_column(
        manager: &SchemaManager<'_>,
        column_name: impl sea_orm::Iden + 'static,
    ) -> ColumnDef {
        match manager.get_database_backend() {
            sea_orm::DatabaseBackend::Postgres => ColumnDef::new(column_name)
                .timestamp_with_time_zone()
                .not_null()
                .to_owned(),
            _ => ColumnDef::new(column_name).timestamp().not_null().to_owned(),
        }
    }
}

#[derive(DeriveIden)]
enum VideoPairs {
    Table,
    Id,
    SubmitterLabel,
    VideoAId,
    VideoAStart,
    VideoAEnd,
    VideoBId,
    VideoBStart,
    VideoBEnd,
    SimilarCount,
    NotSimilarCount,
    CreatedAt,
}

#[derive(DeriveIden)]
enum VideoMetadata {
    Table,
    ExternalId,
    Title,
    Attribution,
    IsPlaceholder,
    FetchedAt,
}

#[derive(DeriveIden)]
enum VoteRecords {
    Table,
    PairId,
    VoterToken,
    Choice,
    CreatedAt,
    UpdatedAt,
}
