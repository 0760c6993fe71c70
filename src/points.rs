//! Point values for user actions

use serde::{Deserialize, Serialize};

use crate::{
  entity::{ActionKind, ResourceType},
  prelude::*,
};

/// Upvotes above this count earn the engagement bonus
const ENGAGEMENT_THRESHOLD: i64 = 10;
const ENGAGEMENT_BONUS_CAP: i64 = 50;
const VERIFIED_BONUS: i64 = 10;

impl ActionKind {
  pub fn base_points(self) -> i64 {
    match self {
      ActionKind::Upload => 10,
      ActionKind::UpvoteReceived => 5,
      ActionKind::DownvoteReceived => -2,
      ActionKind::CreateCollection => 15,
      ActionKind::Download => 2,
      ActionKind::ProfileComplete => 25,
      ActionKind::WeeklyActivity => 50,
      ActionKind::AddToCollection => 3,
      ActionKind::ShareCollection => 8,
      ActionKind::TagResource => 1,
      ActionKind::VerifyResource => 20,
      ActionKind::Comment => 3,
    }
  }

  pub fn describe(self) -> &'static str {
    match self {
      ActionKind::Upload => "uploading a resource",
      ActionKind::UpvoteReceived => "receiving an upvote",
      ActionKind::DownvoteReceived => "receiving a downvote",
      ActionKind::CreateCollection => "creating a collection",
      ActionKind::Download => "downloading a resource",
      ActionKind::ProfileComplete => "completing your profile",
      ActionKind::WeeklyActivity => "staying active this week",
      ActionKind::AddToCollection => "adding to a collection",
      ActionKind::ShareCollection => "sharing a collection",
      ActionKind::TagResource => "tagging a resource",
      ActionKind::VerifyResource => "verifying a resource",
      ActionKind::Comment => "commenting",
    }
  }
}

impl ResourceType {
  pub fn upload_bonus(self) -> i64 {
    match self {
      ResourceType::Video => 5,
      ResourceType::Code => 8,
      ResourceType::Article => 3,
      ResourceType::Link => 2,
      ResourceType::Document | ResourceType::Note => 0,
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionMeta {
  #[serde(default)]
  pub is_verified: bool,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub upvotes: Option<i64>,
  /// Anything else the caller attached, stored verbatim on the contribution
  #[serde(flatten)]
  pub extra: json::Map<String, json::Value>,
}

/// A single point earning event, built per request and never stored as is
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAction {
  #[serde(rename = "action")]
  pub kind: ActionKind,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub resource_id: Option<Uuid>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub collection_id: Option<Uuid>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub resource_type: Option<ResourceType>,
  #[serde(default)]
  pub metadata: ActionMeta,
}

impl UserAction {
  pub fn new(kind: ActionKind) -> Self {
    Self {
      kind,
      resource_id: None,
      collection_id: None,
      resource_type: None,
      metadata: ActionMeta::default(),
    }
  }

  pub fn resource(mut self, id: Uuid, ty: ResourceType) -> Self {
    self.resource_id = Some(id);
    self.resource_type = Some(ty);
    self
  }

  pub fn verified(mut self) -> Self {
    self.metadata.is_verified = true;
    self
  }

  pub fn upvotes(mut self, upvotes: i64) -> Self {
    self.metadata.upvotes = Some(upvotes);
    self
  }

  /// Metadata as stored on the contribution row, `None` when empty
  pub fn metadata_json(&self) -> Option<json::Value> {
    if self.metadata == ActionMeta::default() && self.collection_id.is_none()
    {
      return None;
    }

    let mut value = json::to_value(&self.metadata).ok()?;
    if let (Some(map), Some(collection)) =
      (value.as_object_mut(), self.collection_id)
    {
      map.insert("collection_id".into(), collection.to_string().into());
    }
    Some(value)
  }
}

pub fn calculate_points(action: &UserAction) -> i64 {
  let mut points = action.kind.base_points();

  if action.kind == ActionKind::Upload {
    points += action.resource_type.map_or(0, ResourceType::upload_bonus);
  }

  if action.metadata.is_verified {
    points += VERIFIED_BONUS;
  }

  if let Some(upvotes) =
    action.metadata.upvotes.filter(|&upvotes| upvotes > ENGAGEMENT_THRESHOLD)
  {
    points += upvotes.min(ENGAGEMENT_BONUS_CAP);
  }

  points.max(0)
}

#[cfg(test)]
mod tests {
  use sea_orm::Iterable;

  use super::*;

  #[test]
  fn test_base_points() {
    let expected = [
      (ActionKind::Upload, 10),
      (ActionKind::UpvoteReceived, 5),
      (ActionKind::CreateCollection, 15),
      (ActionKind::Download, 2),
      (ActionKind::ProfileComplete, 25),
      (ActionKind::WeeklyActivity, 50),
      (ActionKind::AddToCollection, 3),
      (ActionKind::ShareCollection, 8),
      (ActionKind::TagResource, 1),
      (ActionKind::VerifyResource, 20),
      (ActionKind::Comment, 3),
    ];

    for (kind, points) in expected {
      assert_eq!(calculate_points(&UserAction::new(kind)), points, "{kind:?}");
    }
  }

  #[test]
  fn test_never_negative() {
    for kind in ActionKind::iter() {
      assert!(calculate_points(&UserAction::new(kind)) >= 0);
      assert!(calculate_points(&UserAction::new(kind).upvotes(3)) >= 0);
    }
    assert_eq!(
      calculate_points(&UserAction::new(ActionKind::DownvoteReceived)),
      0
    );
  }

  #[test]
  fn test_verified_code_upload() {
    let action = UserAction::new(ActionKind::Upload)
      .resource(Uuid::new_v4(), ResourceType::Code)
      .verified();

    assert_eq!(calculate_points(&action), 28);
  }

  #[test]
  fn test_upload_bonus_only_for_uploads() {
    let upload = UserAction::new(ActionKind::Upload)
      .resource(Uuid::new_v4(), ResourceType::Video);
    let comment = UserAction::new(ActionKind::Comment)
      .resource(Uuid::new_v4(), ResourceType::Video);

    assert_eq!(calculate_points(&upload), 15);
    assert_eq!(calculate_points(&comment), 3);
  }

  #[test]
  fn test_engagement_bonus() {
    let upvote = |n| UserAction::new(ActionKind::UpvoteReceived).upvotes(n);

    assert_eq!(calculate_points(&upvote(10)), 5);
    assert_eq!(calculate_points(&upvote(11)), 16);
    assert_eq!(calculate_points(&upvote(500)), 55);
  }

  #[test]
  fn test_action_from_json() {
    let action: UserAction = json::from_value(json::json!({
      "action": "upload_resource",
      "resource_type": "article",
      "metadata": { "is_verified": true, "course": "CS101" }
    }))
    .unwrap();

    assert_eq!(action.kind, ActionKind::Upload);
    assert_eq!(calculate_points(&action), 23);
    assert_eq!(action.metadata.extra["course"], "CS101");

    let stored = action.metadata_json().unwrap();
    assert_eq!(stored["course"], "CS101");
    assert_eq!(stored["is_verified"], true);
  }

  #[test]
  fn test_empty_metadata_not_stored() {
    assert!(UserAction::new(ActionKind::Comment).metadata_json().is_none());
  }
}
