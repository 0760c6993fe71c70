//! Storage access for the points engine
//!
//! Services never talk to a database directly, they go through [`Store`] so
//! tests can swap the SQLite backend for [`memory::Memory`].

mod db;
#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use sea_orm::FromQueryResult;
use serde::Serialize;

pub use self::db::Db;
#[cfg(test)]
pub(crate) use self::db::tests::setup_test_db;
use crate::{
  entity::{ActionKind, contribution, notification, user, user_achievement},
  prelude::*,
};

/// Aggregates over the resources owned by one user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResourceTotals {
  pub resources: i64,
  pub upvotes: i64,
  pub downloads: i64,
  pub max_upvotes: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardFilter {
  pub department: Option<String>,
  /// Only rank users with a contribution at or after this instant
  pub active_since: Option<DateTime>,
  /// Start of the window summed into `weekly_points`
  pub weekly_since: DateTime,
  pub limit: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromQueryResult)]
pub struct LeaderboardRow {
  pub user_id: Uuid,
  pub username: String,
  pub department: Option<String>,
  pub total_points: i64,
  pub upload_count: i64,
  pub collection_count: i64,
  pub weekly_points: i64,
}

#[async_trait]
pub trait Store: Send + Sync {
  async fn user(&self, id: Uuid) -> Result<Option<user::Model>>;

  /// Applies `points = points + delta` at the storage layer.
  /// Fails with [`Error::UserNotFound`] when no row was touched.
  async fn add_points(&self, id: Uuid, delta: i64) -> Result<()>;

  async fn insert_contribution(
    &self,
    contribution: contribution::Model,
  ) -> Result<()>;

  async fn count_contributions(
    &self,
    user_id: Uuid,
    kind: ActionKind,
  ) -> Result<u64>;

  /// Newest first
  async fn contributions_since(
    &self,
    user_id: Uuid,
    since: DateTime,
  ) -> Result<Vec<contribution::Model>>;

  async fn resource_totals(&self, owner_id: Uuid) -> Result<ResourceTotals>;

  async fn has_achievement(
    &self,
    user_id: Uuid,
    achievement_id: &str,
  ) -> Result<bool>;

  /// Must fail if the `(user_id, achievement_id)` pair already exists
  async fn insert_achievement(
    &self,
    grant: user_achievement::Model,
  ) -> Result<()>;

  /// Oldest first
  async fn achievements(
    &self,
    user_id: Uuid,
  ) -> Result<Vec<user_achievement::Model>>;

  async fn insert_notification(
    &self,
    notification: notification::Model,
  ) -> Result<()>;

  /// Ordered by total points descending, ties by user id ascending
  async fn leaderboard(
    &self,
    filter: &LeaderboardFilter,
  ) -> Result<Vec<LeaderboardRow>>;
}
