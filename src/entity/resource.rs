use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::user;

#[derive(
  Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
  #[sea_orm(string_value = "note")]
  Note,
  #[sea_orm(string_value = "document")]
  Document,
  #[sea_orm(string_value = "link")]
  Link,
  #[sea_orm(string_value = "video")]
  Video,
  #[sea_orm(string_value = "code")]
  Code,
  #[sea_orm(string_value = "article")]
  Article,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "resources")]
pub struct Model {
  #[sea_orm(primary_key, auto_increment = false)]
  pub id: Uuid,
  pub owner_id: Uuid,
  pub title: String,
  pub resource_type: ResourceType,
  pub upvotes: i32,
  pub downloads: i32,
  pub is_verified: bool,
  pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(
    belongs_to = "user::Entity",
    from = "Column::OwnerId",
    to = "user::Column::Id"
  )]
  Owner,
}

impl Related<user::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Owner.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
