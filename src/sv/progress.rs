//! Levels, progress views, leaderboards and the action pipeline

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
  catalog::Achievement,
  entity::{NotificationKind, contribution},
  points::{UserAction, calculate_points},
  prelude::*,
  store::{LeaderboardFilter, LeaderboardRow, Store},
  sv::{self, achievements::EarnedAchievement},
  utils,
};

const WEEK_DAYS: i64 = 7;
const MONTH_DAYS: i64 = 30;

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Level {
  Freshman,
  Intermediate,
  Advanced,
  Expert,
  Master,
}

impl Level {
  pub const ALL: [Level; 5] = [
    Level::Freshman,
    Level::Intermediate,
    Level::Advanced,
    Level::Expert,
    Level::Master,
  ];

  pub fn threshold(self) -> i64 {
    match self {
      Level::Freshman => 0,
      Level::Intermediate => 50,
      Level::Advanced => 200,
      Level::Expert => 500,
      Level::Master => 1000,
    }
  }

  /// `Master` is its own successor
  pub fn next(self) -> Level {
    match self {
      Level::Freshman => Level::Intermediate,
      Level::Intermediate => Level::Advanced,
      Level::Advanced => Level::Expert,
      Level::Expert | Level::Master => Level::Master,
    }
  }
}

pub fn calculate_level(points: i64) -> Level {
  Level::ALL
    .into_iter()
    .rev()
    .find(|level| points >= level.threshold())
    .unwrap_or(Level::Freshman)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayActivity {
  pub date: NaiveDate,
  pub points: i64,
  pub contributions: u64,
}

/// Rollup of the trailing 7 days, not aligned to calendar weeks
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeeklyActivity {
  pub points_earned: i64,
  pub contributions: u64,
  pub active_days: u64,
  /// Every calendar date the window touches, oldest first
  pub days: Vec<DayActivity>,
}

impl WeeklyActivity {
  fn rollup(contributions: &[contribution::Model], now: DateTime) -> Self {
    let today = now.date();
    let mut days: BTreeMap<NaiveDate, DayActivity> = (0..=WEEK_DAYS)
      .map(|offset| today - TimeDelta::days(offset))
      .map(|date| (date, DayActivity { date, points: 0, contributions: 0 }))
      .collect();

    for contribution in contributions {
      let day = days.entry(contribution.created_at.date()).or_insert_with_key(
        |&date| DayActivity { date, points: 0, contributions: 0 },
      );
      day.points += contribution.points_earned;
      day.contributions += 1;
    }

    let days: Vec<_> = days.into_values().collect();
    Self {
      points_earned: days.iter().map(|day| day.points).sum(),
      contributions: days.iter().map(|day| day.contributions).sum(),
      active_days: days.iter().filter(|day| day.contributions > 0).count()
        as u64,
      days,
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserProgress {
  pub user_id: Uuid,
  pub total_points: i64,
  pub current_level: Level,
  pub next_level: Level,
  pub points_to_next_level: i64,
  /// How far into the current level, 0 to 100
  pub level_progress: f64,
  pub achievements: Vec<EarnedAchievement>,
  pub recent_achievements: Vec<EarnedAchievement>,
  pub weekly_activity: WeeklyActivity,
}

impl UserProgress {
  fn levels(points: i64) -> (Level, Level, i64, f64) {
    let current = calculate_level(points);
    let next = current.next();

    if current == next {
      return (current, next, 0, 100.0);
    }

    let span = next.threshold() - current.threshold();
    let into = points - current.threshold();
    let to_next = (next.threshold() - points).max(0);
    (current, next, to_next, into as f64 * 100.0 / span as f64)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
  Global,
  Department(String),
  /// Declared for clients but not ranked yet
  Course(String),
}

#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Timeframe {
  #[default]
  AllTime,
  Monthly,
  Weekly,
}

impl Timeframe {
  fn window_days(self) -> Option<i64> {
    match self {
      Timeframe::AllTime => None,
      Timeframe::Monthly => Some(MONTH_DAYS),
      Timeframe::Weekly => Some(WEEK_DAYS),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LeaderboardQuery {
  pub scope: Scope,
  pub timeframe: Timeframe,
  pub limit: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
  pub rank: u64,
  pub user_id: Uuid,
  pub username: String,
  pub department: Option<String>,
  pub total_points: i64,
  pub level: Level,
  pub upload_count: i64,
  pub collection_count: i64,
  pub weekly_points: i64,
}

impl LeaderboardEntry {
  fn ranked(rank: u64, row: LeaderboardRow) -> Self {
    Self {
      rank,
      user_id: row.user_id,
      username: row.username,
      department: row.department,
      total_points: row.total_points,
      level: calculate_level(row.total_points),
      upload_count: row.upload_count,
      collection_count: row.collection_count,
      weekly_points: row.weekly_points,
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgressUpdate {
  pub points_earned: i64,
  pub new_achievements: Vec<&'static Achievement>,
}

pub struct Progress<'a> {
  store: &'a dyn Store,
}

impl<'a> Progress<'a> {
  pub fn new(store: &'a dyn Store) -> Self {
    Self { store }
  }

  /// Credits an action to a user.
  ///
  /// Only the balance increment can fail the call. The contribution row,
  /// the points notification and the achievement pass are best effort: a
  /// failure there is logged and leaves the balance ahead of the audit log,
  /// or the achievements one pass behind.
  pub async fn record(
    &self,
    user_id: Uuid,
    action: &UserAction,
  ) -> Result<ProgressUpdate> {
    let points = calculate_points(action);

    self.store.add_points(user_id, points).await?;
    debug!("Credited {points} points to {user_id} for {:?}", action.kind);

    let contribution = contribution::Model {
      id: Uuid::new_v4(),
      user_id,
      kind: action.kind,
      resource_id: action.resource_id,
      points_earned: points,
      metadata: action.metadata_json(),
      created_at: utils::now(),
    };

    if let Err(err) = self.store.insert_contribution(contribution).await {
      error!("Failed to record contribution for {user_id}: {err}");
    }

    if points > 0 {
      sv::notify(
        self.store,
        user_id,
        NotificationKind::Points,
        format!("+{points} points"),
        format!("You earned {points} points for {}", action.kind.describe()),
        json::json!({ "action": action.kind, "points": points }),
      )
      .await;
    }

    let new_achievements =
      match sv::Achievements::new(self.store).check(user_id).await {
        Ok(granted) => granted,
        Err(err) => {
          warn!("Achievement pass failed for {user_id}: {err}");
          Vec::new()
        }
      };

    Ok(ProgressUpdate { points_earned: points, new_achievements })
  }

  pub async fn user_progress(&self, user_id: Uuid) -> Result<UserProgress> {
    let user =
      self.store.user(user_id).await?.ok_or(Error::UserNotFound(user_id))?;

    let now = utils::now();
    let week_ago = utils::days_ago(now, WEEK_DAYS);

    let earned = sv::Achievements::new(self.store);
    let (achievements, recent) = futures::try_join!(
      earned.earned(user_id),
      self.store.contributions_since(user_id, week_ago),
    )?;

    let recent_achievements = achievements
      .iter()
      .filter(|earned| earned.earned_at >= week_ago)
      .cloned()
      .collect();

    let (current_level, next_level, points_to_next_level, level_progress) =
      UserProgress::levels(user.points);

    Ok(UserProgress {
      user_id,
      total_points: user.points,
      current_level,
      next_level,
      points_to_next_level,
      level_progress,
      achievements,
      recent_achievements,
      weekly_activity: WeeklyActivity::rollup(&recent, now),
    })
  }

  pub async fn leaderboard(
    &self,
    query: &LeaderboardQuery,
  ) -> Result<Vec<LeaderboardEntry>> {
    let department = match &query.scope {
      Scope::Global => None,
      Scope::Department(department) => Some(department.clone()),
      Scope::Course(_) => return Err(Error::UnsupportedScope("course")),
    };

    let now = utils::now();
    let filter = LeaderboardFilter {
      department,
      active_since: query
        .timeframe
        .window_days()
        .map(|days| utils::days_ago(now, days)),
      weekly_since: utils::days_ago(now, WEEK_DAYS),
      limit: query.limit,
    };

    let rows = self.store.leaderboard(&filter).await?;

    Ok(
      rows
        .into_iter()
        .zip(1..)
        .map(|(row, rank)| LeaderboardEntry::ranked(rank, row))
        .collect(),
    )
  }
}
