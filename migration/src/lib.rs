pub use sea_orm_migration::prelude::*;

pub mod entities;
mod m20260301_000001_initial_tables;
mod m20260301_000002_sharing_events;
mod m20260302_000001_caption_generations;
mod m20260309_000001_sharing_reports;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_initial_tables::Migration),
            Box::new(m20260301_000002_sharing_events::Migration),
            Box::new(m20260302_000001_caption_generations::Migration),
            Box::new(m20260309_000001_sharing_reports::Migration),
        ]
    }
}
