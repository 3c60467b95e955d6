//! SeaORM migrations for multi-database support
//!
//! Migrations work across SQLite, PostgreSQL, and MySQL. Column types are
//! picked per backend where the natural type differs (UUIDs, timestamps).

use sea_orm_migration::prelude::*;

pub mod m20261017_000001_initial_schema;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20261017_000001_initial_schema::Migration)]
    }
}
