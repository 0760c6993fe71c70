use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
  #[sea_orm(primary_key, auto_increment = false)]
  pub id: Uuid,
  pub username: String,
  pub department: Option<String>,
  /// Running balance, only ever changed through `points = points + delta`
  pub points: i64,
  pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(has_many = "super::contribution::Entity")]
  Contributions,
  #[sea_orm(has_many = "super::user_achievement::Entity")]
  Achievements,
  #[sea_orm(has_many = "super::resource::Entity")]
  Resources,
}

impl Related<super::contribution::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Contributions.def()
  }
}

impl Related<super::user_achievement::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Achievements.def()
  }
}

impl Related<super::resource::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Resources.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
