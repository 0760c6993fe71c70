//! Per-user statistics snapshot built from persisted records

use serde::Serialize;

use crate::{catalog::Stat, entity::ActionKind, prelude::*, store::Store, utils};

/// Streaks are only looked up this far back
pub const STREAK_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserStats {
  pub total_points: i64,
  pub upload_count: i64,
  pub collection_count: i64,
  pub total_upvotes: i64,
  pub total_downloads: i64,
  pub downloads_made: i64,
  pub max_resource_upvotes: i64,
  pub consecutive_days: i64,
}

impl UserStats {
  pub fn get(&self, stat: Stat) -> i64 {
    match stat {
      Stat::Uploads => self.upload_count,
      Stat::Collections => self.collection_count,
      Stat::TotalUpvotes => self.total_upvotes,
      Stat::TotalDownloads => self.total_downloads,
      Stat::DownloadsMade => self.downloads_made,
      Stat::MaxResourceUpvotes => self.max_resource_upvotes,
    }
  }
}

pub struct Stats<'a> {
  store: &'a dyn Store,
}

impl<'a> Stats<'a> {
  pub fn new(store: &'a dyn Store) -> Self {
    Self { store }
  }

  pub async fn user_stats(&self, user_id: Uuid) -> Result<UserStats> {
    let user =
      self.store.user(user_id).await?.ok_or(Error::UserNotFound(user_id))?;

    let now = utils::now();
    let since = utils::days_ago(now, STREAK_WINDOW_DAYS);

    let (uploads, collections, downloads_made, totals, recent) = futures::try_join!(
      self.store.count_contributions(user_id, ActionKind::Upload),
      self.store.count_contributions(user_id, ActionKind::CreateCollection),
      self.store.count_contributions(user_id, ActionKind::Download),
      self.store.resource_totals(user_id),
      self.store.contributions_since(user_id, since),
    )?;

    let consecutive_days = utils::active_streak(
      recent.iter().map(|c| c.created_at.date()),
      now.date(),
      STREAK_WINDOW_DAYS,
    );

    Ok(UserStats {
      total_points: user.points,
      upload_count: uploads as i64,
      collection_count: collections as i64,
      total_upvotes: totals.upvotes,
      total_downloads: totals.downloads,
      downloads_made: downloads_made as i64,
      max_resource_upvotes: totals.max_upvotes,
      consecutive_days,
    })
  }
}
