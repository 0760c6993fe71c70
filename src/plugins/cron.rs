use std::sync::Arc;

use async_trait::async_trait;

use crate::state::AppState;

/// Periodic housekeeping, currently only leaderboard cache eviction
pub struct Plugin;

#[async_trait]
impl super::Plugin for Plugin {
  async fn start(&self, app: Arc<AppState>) -> anyhow::Result<()> {
    let mut interval = tokio::time::interval(app.config.cache_gc_interval);
    loop {
      interval.tick().await;
      app.gc_cache();
    }
  }
}
