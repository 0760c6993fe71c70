//! Append-only audit log of point earning events

use json::Value;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::user;

#[derive(
  Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum ActionKind {
  #[sea_orm(string_value = "upload_resource")]
  #[serde(rename = "upload_resource")]
  Upload,
  #[sea_orm(string_value = "receive_upvote")]
  #[serde(rename = "receive_upvote")]
  UpvoteReceived,
  #[sea_orm(string_value = "receive_downvote")]
  #[serde(rename = "receive_downvote")]
  DownvoteReceived,
  #[sea_orm(string_value = "create_collection")]
  #[serde(rename = "create_collection")]
  CreateCollection,
  #[sea_orm(string_value = "download_resource")]
  #[serde(rename = "download_resource")]
  Download,
  #[sea_orm(string_value = "complete_profile")]
  #[serde(rename = "complete_profile")]
  ProfileComplete,
  #[sea_orm(string_value = "weekly_active")]
  #[serde(rename = "weekly_active")]
  WeeklyActivity,
  #[sea_orm(string_value = "add_to_collection")]
  #[serde(rename = "add_to_collection")]
  AddToCollection,
  #[sea_orm(string_value = "share_collection")]
  #[serde(rename = "share_collection")]
  ShareCollection,
  #[sea_orm(string_value = "tag_resource")]
  #[serde(rename = "tag_resource")]
  TagResource,
  #[sea_orm(string_value = "verify_resource")]
  #[serde(rename = "verify_resource")]
  VerifyResource,
  #[sea_orm(string_value = "comment")]
  #[serde(rename = "comment")]
  Comment,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "contributions")]
pub struct Model {
  #[sea_orm(primary_key, auto_increment = false)]
  pub id: Uuid,
  pub user_id: Uuid,
  pub kind: ActionKind,
  pub resource_id: Option<Uuid>,
  pub points_earned: i64,
  /// action metadata as submitted by the caller
  pub metadata: Option<Value>,
  pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(
    belongs_to = "user::Entity",
    from = "Column::UserId",
    to = "user::Column::Id"
  )]
  User,
}

impl Related<user::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::User.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
