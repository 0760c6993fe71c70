use async_trait::async_trait;
use sea_orm::{
  ConnectionTrait, FromQueryResult, Statement, Value, sea_query::Expr,
};

use super::{LeaderboardFilter, LeaderboardRow, ResourceTotals, Store};
use crate::{
  entity::{
    ActionKind, contribution, notification, resource, user, user_achievement,
  },
  prelude::*,
};

/// One statement for the whole board, per-user counts are correlated
/// subqueries instead of a query per row.
const LEADERBOARD_SQL: &str = r#"
SELECT
  u.id AS user_id,
  u.username AS username,
  u.department AS department,
  u.points AS total_points,
  (SELECT COUNT(*) FROM resources r WHERE r.owner_id = u.id) AS upload_count,
  (SELECT COUNT(*) FROM collections c WHERE c.owner_id = u.id) AS collection_count,
  (SELECT COALESCE(SUM(w.points_earned), 0) FROM contributions w
    WHERE w.user_id = u.id AND w.created_at >= ?) AS weekly_points
FROM users u
WHERE (? IS NULL OR u.department = ?)
  AND (? IS NULL OR EXISTS (
    SELECT 1 FROM contributions a
    WHERE a.user_id = u.id AND a.created_at >= ?
  ))
ORDER BY u.points DESC, u.id ASC
LIMIT ?
"#;

#[derive(Debug, FromQueryResult)]
struct Totals {
  resources: i64,
  upvotes: Option<i64>,
  downloads: Option<i64>,
  max_upvotes: Option<i64>,
}

/// SeaORM backed store
pub struct Db {
  db: DatabaseConnection,
}

impl Db {
  pub fn new(db: DatabaseConnection) -> Self {
    Self { db }
  }

  #[cfg(test)]
  pub fn conn(&self) -> &DatabaseConnection {
    &self.db
  }
}

#[async_trait]
impl Store for Db {
  async fn user(&self, id: Uuid) -> Result<Option<user::Model>> {
    Ok(user::Entity::find_by_id(id).one(&self.db).await?)
  }

  async fn add_points(&self, id: Uuid, delta: i64) -> Result<()> {
    let res = user::Entity::update_many()
      .col_expr(user::Column::Points, Expr::col(user::Column::Points).add(delta))
      .filter(user::Column::Id.eq(id))
      .exec(&self.db)
      .await?;

    if res.rows_affected == 0 {
      return Err(Error::UserNotFound(id));
    }
    Ok(())
  }

  async fn insert_contribution(
    &self,
    contribution: contribution::Model,
  ) -> Result<()> {
    contribution::ActiveModel {
      id: Set(contribution.id),
      user_id: Set(contribution.user_id),
      kind: Set(contribution.kind),
      resource_id: Set(contribution.resource_id),
      points_earned: Set(contribution.points_earned),
      metadata: Set(contribution.metadata),
      created_at: Set(contribution.created_at),
    }
    .insert(&self.db)
    .await?;

    Ok(())
  }

  async fn count_contributions(
    &self,
    user_id: Uuid,
    kind: ActionKind,
  ) -> Result<u64> {
    let count = contribution::Entity::find()
      .filter(contribution::Column::UserId.eq(user_id))
      .filter(contribution::Column::Kind.eq(kind))
      .count(&self.db)
      .await?;
    Ok(count)
  }

  async fn contributions_since(
    &self,
    user_id: Uuid,
    since: DateTime,
  ) -> Result<Vec<contribution::Model>> {
    let contributions = contribution::Entity::find()
      .filter(contribution::Column::UserId.eq(user_id))
      .filter(contribution::Column::CreatedAt.gte(since))
      .order_by_desc(contribution::Column::CreatedAt)
      .all(&self.db)
      .await?;
    Ok(contributions)
  }

  async fn resource_totals(&self, owner_id: Uuid) -> Result<ResourceTotals> {
    let totals = resource::Entity::find()
      .select_only()
      .column_as(resource::Column::Id.count(), "resources")
      .column_as(resource::Column::Upvotes.sum(), "upvotes")
      .column_as(resource::Column::Downloads.sum(), "downloads")
      .column_as(resource::Column::Upvotes.max(), "max_upvotes")
      .filter(resource::Column::OwnerId.eq(owner_id))
      .into_model::<Totals>()
      .one(&self.db)
      .await?;

    Ok(totals.map_or_else(ResourceTotals::default, |totals| ResourceTotals {
      resources: totals.resources,
      upvotes: totals.upvotes.unwrap_or_default(),
      downloads: totals.downloads.unwrap_or_default(),
      max_upvotes: totals.max_upvotes.unwrap_or_default(),
    }))
  }

  async fn has_achievement(
    &self,
    user_id: Uuid,
    achievement_id: &str,
  ) -> Result<bool> {
    let grant =
      user_achievement::Entity::find_by_id((user_id, achievement_id.to_string()))
        .one(&self.db)
        .await?;
    Ok(grant.is_some())
  }

  async fn insert_achievement(
    &self,
    grant: user_achievement::Model,
  ) -> Result<()> {
    user_achievement::ActiveModel {
      user_id: Set(grant.user_id),
      achievement_id: Set(grant.achievement_id),
      points_earned: Set(grant.points_earned),
      earned_at: Set(grant.earned_at),
    }
    .insert(&self.db)
    .await?;

    Ok(())
  }

  async fn achievements(
    &self,
    user_id: Uuid,
  ) -> Result<Vec<user_achievement::Model>> {
    let grants = user_achievement::Entity::find()
      .filter(user_achievement::Column::UserId.eq(user_id))
      .order_by_asc(user_achievement::Column::EarnedAt)
      .all(&self.db)
      .await?;
    Ok(grants)
  }

  async fn insert_notification(
    &self,
    notification: notification::Model,
  ) -> Result<()> {
    notification::ActiveModel {
      id: Set(notification.id),
      user_id: Set(notification.user_id),
      kind: Set(notification.kind),
      title: Set(notification.title),
      message: Set(notification.message),
      data: Set(notification.data),
      is_read: Set(notification.is_read),
      created_at: Set(notification.created_at),
    }
    .insert(&self.db)
    .await?;

    Ok(())
  }

  async fn leaderboard(
    &self,
    filter: &LeaderboardFilter,
  ) -> Result<Vec<LeaderboardRow>> {
    let values: Vec<Value> = vec![
      filter.weekly_since.into(),
      filter.department.clone().into(),
      filter.department.clone().into(),
      filter.active_since.into(),
      filter.active_since.into(),
      i64::try_from(filter.limit).unwrap_or(i64::MAX).into(),
    ];

    let rows = LeaderboardRow::find_by_statement(
      Statement::from_sql_and_values(
        self.db.get_database_backend(),
        LEADERBOARD_SQL,
        values,
      ),
    )
    .all(&self.db)
    .await?;

    Ok(rows)
  }
}
