//! Database schema migrations for Wordless.
//!
//! Run from the CLI (`cargo run -p migration -- up`) or programmatically at
//! server startup via [`Migrator::up`].

pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_schema;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20240101_000001_create_schema::Migration)]
    }
}
