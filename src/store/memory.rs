//! In-memory [`Store`] for service tests

use async_trait::async_trait;
use sea_orm::DbErr;

use super::{LeaderboardFilter, LeaderboardRow, ResourceTotals, Store};
use crate::{
  entity::{
    ActionKind, collection, contribution, notification, resource, user,
    user_achievement,
  },
  prelude::*,
};

#[derive(Default)]
pub struct Memory {
  users: DashMap<Uuid, user::Model>,
  resources: DashMap<Uuid, Vec<resource::Model>>,
  collections: DashMap<Uuid, Vec<collection::Model>>,
  contributions: DashMap<Uuid, Vec<contribution::Model>>,
  achievements: DashMap<(Uuid, String), user_achievement::Model>,
  notifications: DashMap<Uuid, Vec<notification::Model>>,
  broken_notifications: bool,
  broken_contributions: bool,
  broken_grants: Vec<&'static str>,
}

impl Memory {
  pub fn new() -> Self {
    Self::default()
  }

  /// Every notification insert fails afterwards
  pub fn without_notifications(mut self) -> Self {
    self.broken_notifications = true;
    self
  }

  /// Every contribution insert fails afterwards
  pub fn without_contributions(mut self) -> Self {
    self.broken_contributions = true;
    self
  }

  /// Granting `achievement_id` to anyone fails
  pub fn failing_grant(mut self, achievement_id: &'static str) -> Self {
    self.broken_grants.push(achievement_id);
    self
  }

  pub fn add_user(&self, username: &str, points: i64) -> Uuid {
    self.add_user_in(username, None, points)
  }

  pub fn add_user_in(
    &self,
    username: &str,
    department: Option<&str>,
    points: i64,
  ) -> Uuid {
    let id = Uuid::new_v4();
    self.users.insert(id, user::Model {
      id,
      username: username.into(),
      department: department.map(Into::into),
      points,
      created_at: Utc::now().naive_utc(),
    });
    id
  }

  pub fn add_resource(&self, owner_id: Uuid, upvotes: i32, downloads: i32) {
    self.resources.entry(owner_id).or_default().push(resource::Model {
      id: Uuid::new_v4(),
      owner_id,
      title: "Past exam".into(),
      resource_type: crate::entity::ResourceType::Document,
      upvotes,
      downloads,
      is_verified: false,
      created_at: Utc::now().naive_utc(),
    });
  }

  pub fn add_collection(&self, owner_id: Uuid) {
    self.collections.entry(owner_id).or_default().push(collection::Model {
      id: Uuid::new_v4(),
      owner_id,
      title: "Exam prep".into(),
      is_public: true,
      created_at: Utc::now().naive_utc(),
    });
  }

  /// Backdated contribution that bypasses the points pipeline
  pub fn add_contribution(
    &self,
    user_id: Uuid,
    kind: ActionKind,
    points_earned: i64,
    created_at: DateTime,
  ) {
    self.contributions.entry(user_id).or_default().push(contribution::Model {
      id: Uuid::new_v4(),
      user_id,
      kind,
      resource_id: None,
      points_earned,
      metadata: None,
      created_at,
    });
  }

  pub fn points(&self, user_id: Uuid) -> i64 {
    self.users.get(&user_id).map_or(0, |user| user.points)
  }

  pub fn contributions(&self, user_id: Uuid) -> Vec<contribution::Model> {
    self.contributions.get(&user_id).map(|c| c.clone()).unwrap_or_default()
  }

  pub fn notifications(&self, user_id: Uuid) -> Vec<notification::Model> {
    self.notifications.get(&user_id).map(|n| n.clone()).unwrap_or_default()
  }
}

fn unavailable(table: &str) -> Error {
  Error::Database(DbErr::Custom(format!("{table} table unavailable")))
}

#[async_trait]
impl Store for Memory {
  async fn user(&self, id: Uuid) -> Result<Option<user::Model>> {
    Ok(self.users.get(&id).map(|user| user.clone()))
  }

  async fn add_points(&self, id: Uuid, delta: i64) -> Result<()> {
    let mut user = self.users.get_mut(&id).ok_or(Error::UserNotFound(id))?;
    user.points += delta;
    Ok(())
  }

  async fn insert_contribution(
    &self,
    contribution: contribution::Model,
  ) -> Result<()> {
    if self.broken_contributions {
      return Err(unavailable("contributions"));
    }

    self
      .contributions
      .entry(contribution.user_id)
      .or_default()
      .push(contribution);
    Ok(())
  }

  async fn count_contributions(
    &self,
    user_id: Uuid,
    kind: ActionKind,
  ) -> Result<u64> {
    let count = self.contributions.get(&user_id).map_or(0, |contributions| {
      contributions.iter().filter(|c| c.kind == kind).count()
    });
    Ok(count as u64)
  }

  async fn contributions_since(
    &self,
    user_id: Uuid,
    since: DateTime,
  ) -> Result<Vec<contribution::Model>> {
    let mut recent: Vec<_> = self
      .contributions(user_id)
      .into_iter()
      .filter(|c| c.created_at >= since)
      .collect();
    recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(recent)
  }

  async fn resource_totals(&self, owner_id: Uuid) -> Result<ResourceTotals> {
    let Some(resources) = self.resources.get(&owner_id) else {
      return Ok(ResourceTotals::default());
    };

    Ok(ResourceTotals {
      resources: resources.len() as i64,
      upvotes: resources.iter().map(|r| r.upvotes as i64).sum(),
      downloads: resources.iter().map(|r| r.downloads as i64).sum(),
      max_upvotes: resources.iter().map(|r| r.upvotes as i64).max().unwrap_or(0),
    })
  }

  async fn has_achievement(
    &self,
    user_id: Uuid,
    achievement_id: &str,
  ) -> Result<bool> {
    Ok(self.achievements.contains_key(&(user_id, achievement_id.to_string())))
  }

  async fn insert_achievement(
    &self,
    grant: user_achievement::Model,
  ) -> Result<()> {
    use dashmap::mapref::entry::Entry;

    if self.broken_grants.iter().any(|id| *id == grant.achievement_id) {
      return Err(unavailable("user_achievements"));
    }

    match self.achievements.entry((grant.user_id, grant.achievement_id.clone()))
    {
      Entry::Occupied(_) => Err(Error::Database(DbErr::RecordNotInserted)),
      Entry::Vacant(entry) => {
        entry.insert(grant);
        Ok(())
      }
    }
  }

  async fn achievements(
    &self,
    user_id: Uuid,
  ) -> Result<Vec<user_achievement::Model>> {
    let mut grants: Vec<_> = self
      .achievements
      .iter()
      .filter(|grant| grant.user_id == user_id)
      .map(|grant| grant.clone())
      .collect();
    grants.sort_by(|a, b| a.earned_at.cmp(&b.earned_at));
    Ok(grants)
  }

  async fn insert_notification(
    &self,
    notification: notification::Model,
  ) -> Result<()> {
    if self.broken_notifications {
      return Err(unavailable("notifications"));
    }

    self
      .notifications
      .entry(notification.user_id)
      .or_default()
      .push(notification);
    Ok(())
  }

  async fn leaderboard(
    &self,
    filter: &LeaderboardFilter,
  ) -> Result<Vec<LeaderboardRow>> {
    let users: Vec<user::Model> =
      self.users.iter().map(|user| user.clone()).collect();

    let mut rows: Vec<LeaderboardRow> = users
      .into_iter()
      .filter(|user| match &filter.department {
        Some(department) => user.department.as_ref() == Some(department),
        None => true,
      })
      .filter(|user| match filter.active_since {
        Some(since) => {
          self.contributions(user.id).iter().any(|c| c.created_at >= since)
        }
        None => true,
      })
      .map(|user| {
        let weekly_points = self
          .contributions(user.id)
          .iter()
          .filter(|c| c.created_at >= filter.weekly_since)
          .map(|c| c.points_earned)
          .sum();

        LeaderboardRow {
          user_id: user.id,
          upload_count: self.resources.get(&user.id).map_or(0, |r| r.len()) as i64,
          collection_count: self
            .collections
            .get(&user.id)
            .map_or(0, |c| c.len()) as i64,
          weekly_points,
          username: user.username,
          department: user.department,
          total_points: user.points,
        }
      })
      .collect();

    rows.sort_by(|a, b| {
      b.total_points.cmp(&a.total_points).then(a.user_id.cmp(&b.user_id))
    });
    rows.truncate(filter.limit as usize);
    Ok(rows)
  }
}
