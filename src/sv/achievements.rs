//! Grants catalog achievements whose criteria a user has met

use serde::Serialize;

use crate::{
  catalog::{self, Achievement, CATALOG},
  entity::{NotificationKind, user_achievement},
  prelude::*,
  store::Store,
  sv::{self, stats::UserStats},
  utils,
};

#[derive(Debug, Clone, Serialize)]
pub struct EarnedAchievement {
  #[serde(flatten)]
  pub achievement: &'static Achievement,
  pub points_earned: i64,
  pub earned_at: DateTime,
}

pub struct Achievements<'a> {
  store: &'a dyn Store,
}

impl<'a> Achievements<'a> {
  pub fn new(store: &'a dyn Store) -> Self {
    Self { store }
  }

  /// Evaluates the whole catalog against one stats snapshot and returns the
  /// achievements granted by this pass, in catalog order.
  ///
  /// Bonus points granted here are not part of the snapshot, so a points
  /// criterion they satisfy is picked up by the next pass.
  pub async fn check(&self, user_id: Uuid) -> Result<Vec<&'static Achievement>> {
    let stats = sv::Stats::new(self.store).user_stats(user_id).await?;

    let mut granted = Vec::new();
    for achievement in CATALOG.iter() {
      match self.try_grant(user_id, achievement, &stats).await {
        Ok(true) => granted.push(achievement),
        Ok(false) => {}
        Err(err) => warn!(
          "Achievement `{}` check failed for {user_id}: {err}",
          achievement.id
        ),
      }
    }

    Ok(granted)
  }

  async fn try_grant(
    &self,
    user_id: Uuid,
    achievement: &'static Achievement,
    stats: &UserStats,
  ) -> Result<bool> {
    if !achievement.criteria.is_met(stats)
      || self.store.has_achievement(user_id, achievement.id).await?
    {
      return Ok(false);
    }

    // the primary key rejects a grant raced in by a concurrent pass
    self
      .store
      .insert_achievement(user_achievement::Model {
        user_id,
        achievement_id: achievement.id.to_string(),
        points_earned: achievement.points,
        earned_at: utils::now(),
      })
      .await?;

    if let Err(err) = self.store.add_points(user_id, achievement.points).await
    {
      error!(
        "Granted `{}` to {user_id} but failed to credit {} points: {err}",
        achievement.id, achievement.points
      );
    }

    sv::notify(
      self.store,
      user_id,
      NotificationKind::Achievement,
      format!("Achievement unlocked: {}", achievement.title),
      format!(
        "{} {} (+{} points)",
        achievement.icon, achievement.description, achievement.points
      ),
      json::json!({
        "achievement_id": achievement.id,
        "points": achievement.points,
        "rarity": achievement.rarity,
      }),
    )
    .await;

    info!("Granted achievement `{}` to {user_id}", achievement.id);
    Ok(true)
  }

  /// Granted achievements joined with their catalog entries, oldest first.
  /// Grants for ids no longer in the catalog are skipped.
  pub async fn earned(&self, user_id: Uuid) -> Result<Vec<EarnedAchievement>> {
    let grants = self.store.achievements(user_id).await?;

    Ok(
      grants
        .into_iter()
        .filter_map(|grant| {
          catalog::by_id(&grant.achievement_id).map(|achievement| {
            EarnedAchievement {
              achievement,
              points_earned: grant.points_earned,
              earned_at: grant.earned_at,
            }
          })
        })
        .collect(),
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{entity::ActionKind, store::memory::Memory};

  fn ids(achievements: &[&Achievement]) -> Vec<&'static str> {
    achievements.iter().map(|a| a.id).collect()
  }

  fn uploads(store: &Memory, user_id: Uuid, count: usize) {
    for _ in 0..count {
      store.add_contribution(user_id, ActionKind::Upload, 10, utils::now());
    }
  }

  #[tokio::test]
  async fn test_check_is_idempotent() {
    let store = Memory::new();
    let id = store.add_user("alice", 0);
    uploads(&store, id, 1);
    let sv = Achievements::new(&store);

    let first = sv.check(id).await.unwrap();
    assert_eq!(ids(&first), ["first_upload"]);

    let second = sv.check(id).await.unwrap();
    assert!(second.is_empty());
    assert_eq!(store.points(id), 10);
    assert_eq!(sv.earned(id).await.unwrap().len(), 1);
  }

  #[tokio::test]
  async fn test_prolific_uploader_granted_once() {
    let store = Memory::new();
    let id = store.add_user("bob", 90);
    uploads(&store, id, 9);
    let sv = Achievements::new(&store);

    assert_eq!(ids(&sv.check(id).await.unwrap()), ["first_upload"]);
    let before = store.points(id);

    uploads(&store, id, 1);
    assert_eq!(ids(&sv.check(id).await.unwrap()), ["prolific_uploader"]);
    assert_eq!(store.points(id), before + 50);

    let notifications: Vec<_> = store
      .notifications(id)
      .into_iter()
      .filter(|n| n.data.as_ref().unwrap()["achievement_id"] == "prolific_uploader")
      .collect();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].kind, NotificationKind::Achievement);

    uploads(&store, id, 1);
    assert!(sv.check(id).await.unwrap().is_empty());
    assert_eq!(store.points(id), before + 50);
  }

  #[tokio::test]
  async fn test_multiple_grants_in_one_pass() {
    let store = Memory::new();
    let id = store.add_user("carol", 0);
    uploads(&store, id, 1);
    store.add_contribution(id, ActionKind::CreateCollection, 15, utils::now());
    store.add_resource(id, 10, 0);

    let granted = Achievements::new(&store).check(id).await.unwrap();

    assert_eq!(ids(&granted), ["first_upload", "first_collection", "popular_content"]);
    assert_eq!(store.points(id), 10 + 15 + 30);
    assert_eq!(store.notifications(id).len(), 3);
  }

  #[tokio::test]
  async fn test_points_bonus_lags_one_pass() {
    let store = Memory::new();
    let id = store.add_user("dave", 995);
    uploads(&store, id, 1);
    let sv = Achievements::new(&store);

    // first_upload pushes the balance to 1005 after the snapshot was taken
    assert_eq!(ids(&sv.check(id).await.unwrap()), ["first_upload"]);
    assert_eq!(ids(&sv.check(id).await.unwrap()), ["point_master"]);
    assert_eq!(store.points(id), 995 + 10 + 500);
  }

  #[tokio::test]
  async fn test_notification_failure_does_not_block_grant() {
    let store = Memory::new().without_notifications();
    let id = store.add_user("erin", 0);
    uploads(&store, id, 1);

    let granted = Achievements::new(&store).check(id).await.unwrap();

    assert_eq!(ids(&granted), ["first_upload"]);
    assert_eq!(store.points(id), 10);
    assert!(store.notifications(id).is_empty());
  }

  #[tokio::test]
  async fn test_failed_grant_does_not_stop_pass() {
    let store = Memory::new().failing_grant("first_upload");
    let id = store.add_user("fay", 0);
    uploads(&store, id, 1);
    store.add_contribution(id, ActionKind::CreateCollection, 15, utils::now());

    let granted = Achievements::new(&store).check(id).await.unwrap();

    assert_eq!(ids(&granted), ["first_collection"]);
    assert_eq!(store.points(id), 15);
    let earned = Achievements::new(&store).earned(id).await.unwrap();
    assert_eq!(earned.len(), 1);
    assert_eq!(earned[0].achievement.id, "first_collection");
    assert_eq!(store.notifications(id).len(), 1);
  }

  #[tokio::test]
  async fn test_unknown_user() {
    let store = Memory::new();
    assert!(matches!(
      Achievements::new(&store).check(Uuid::new_v4()).await,
      Err(Error::UserNotFound(_))
    ));
  }
}
