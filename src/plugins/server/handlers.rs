use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::{
  catalog::{Achievement, CATALOG},
  points::UserAction,
  prelude::*,
  state::{AppState, Config},
  sv::{
    progress::{
      LeaderboardEntry, LeaderboardQuery, ProgressUpdate, Scope, Timeframe,
      UserProgress,
    },
    stats::UserStats,
  },
};

pub async fn health() -> &'static str {
  "OK"
}

pub async fn catalog() -> Json<&'static [Achievement]> {
  Json(CATALOG.as_slice())
}

pub async fn record_action(
  State(app): State<Arc<AppState>>,
  Path(user_id): Path<Uuid>,
  Json(action): Json<UserAction>,
) -> Result<Json<ProgressUpdate>> {
  let update = app.sv().progress.record(user_id, &action).await?;
  Ok(Json(update))
}

pub async fn user_stats(
  State(app): State<Arc<AppState>>,
  Path(user_id): Path<Uuid>,
) -> Result<Json<UserStats>> {
  Ok(Json(app.sv().stats.user_stats(user_id).await?))
}

pub async fn user_progress(
  State(app): State<Arc<AppState>>,
  Path(user_id): Path<Uuid>,
) -> Result<Json<UserProgress>> {
  Ok(Json(app.sv().progress.user_progress(user_id).await?))
}

pub async fn check_achievements(
  State(app): State<Arc<AppState>>,
  Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<&'static Achievement>>> {
  Ok(Json(app.sv().achievements.check(user_id).await?))
}

#[derive(Debug, Default, Deserialize)]
pub struct LeaderboardParams {
  pub scope: Option<String>,
  pub department: Option<String>,
  pub course: Option<String>,
  pub timeframe: Option<Timeframe>,
  pub limit: Option<u64>,
}

impl LeaderboardParams {
  fn into_query(self, config: &Config) -> Result<LeaderboardQuery> {
    let scope = match self.scope.as_deref().unwrap_or("global") {
      "global" => Scope::Global,
      "department" => Scope::Department(self.department.ok_or_else(|| {
        Error::BadRequest("`department` is required for department scope".into())
      })?),
      "course" => Scope::Course(self.course.unwrap_or_default()),
      other => {
        return Err(Error::BadRequest(format!("Unknown scope `{other}`")));
      }
    };

    let limit = self
      .limit
      .unwrap_or(config.leaderboard_default_limit)
      .clamp(1, config.leaderboard_max_limit.max(1));

    Ok(LeaderboardQuery {
      scope,
      timeframe: self.timeframe.unwrap_or_default(),
      limit,
    })
  }
}

pub async fn leaderboard(
  State(app): State<Arc<AppState>>,
  Query(params): Query<LeaderboardParams>,
) -> Result<Json<Arc<Vec<LeaderboardEntry>>>> {
  let query = params.into_query(&app.config)?;
  Ok(Json(app.leaderboard(query).await?))
}
