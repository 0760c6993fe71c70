//! Database migrations using SeaORM

pub use sea_orm_migration::prelude::*;

mod m20261001_000001_create_users;
mod m20261001_000002_create_resources;
mod m20261001_000003_create_collections;
mod m20261001_000004_create_contributions;
mod m20261001_000005_create_user_achievements;
mod m20261001_000006_create_notifications;
mod m20261008_000007_add_user_department;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
  fn migrations() -> Vec<Box<dyn MigrationTrait>> {
    vec![
      Box::new(m20261001_000001_create_users::Migration),
      Box::new(m20261001_000002_create_resources::Migration),
      Box::new(m20261001_000003_create_collections::Migration),
      Box::new(m20261001_000004_create_contributions::Migration),
      Box::new(m20261001_000005_create_user_achievements::Migration),
      Box::new(m20261001_000006_create_notifications::Migration),
      Box::new(m20261008_000007_add_user_department::Migration),
    ]
  }
}
