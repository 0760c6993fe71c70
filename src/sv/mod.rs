pub mod achievements;
pub mod progress;
pub mod stats;

pub use achievements::Achievements;
pub use progress::Progress;
pub use stats::Stats;

use crate::{
  entity::{NotificationKind, notification},
  prelude::*,
  store::Store,
  utils,
};

/// Queues a notification row. Delivery is someone else's job, and a failed
/// insert never fails the caller.
pub(crate) async fn notify(
  store: &dyn Store,
  user_id: Uuid,
  kind: NotificationKind,
  title: impl Into<String>,
  message: impl Into<String>,
  data: json::Value,
) {
  let notification = notification::Model {
    id: Uuid::new_v4(),
    user_id,
    kind,
    title: title.into(),
    message: message.into(),
    data: Some(data),
    is_read: false,
    created_at: utils::now(),
  };

  if let Err(err) = store.insert_notification(notification).await {
    warn!("Failed to queue {kind:?} notification for {user_id}: {err}");
  }
}
