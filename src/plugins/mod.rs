pub mod cron;
pub mod server;

use std::sync::Arc;

use async_trait::async_trait;
use tokio::{sync::watch, task::JoinHandle};

use crate::{prelude::*, state::AppState};

/// Long-running part of the service, restarted by [`App`] when it returns
#[async_trait]
pub trait Plugin: Send + Sync {
  fn name(&self) -> &'static str {
    std::any::type_name::<Self>()
  }

  async fn start(&self, app: Arc<AppState>) -> anyhow::Result<()>;
}

pub struct App {
  plugins: Vec<Arc<dyn Plugin>>,
  restart_delay: Duration,
}

impl App {
  pub fn new() -> Self {
    Self { plugins: Vec::new(), restart_delay: Duration::from_secs(5) }
  }

  pub fn register<P: Plugin + 'static>(mut self, plugin: P) -> Self {
    self.plugins.push(Arc::new(plugin));
    self
  }

  pub fn restart_delay(mut self, delay: Duration) -> Self {
    self.restart_delay = delay;
    self
  }

  /// Spawns one supervisor per plugin. Plugins run until [`Running::shutdown`].
  pub fn run(self, app: Arc<AppState>) -> Running {
    let (shutdown, stop) = watch::channel(false);

    let tasks = self
      .plugins
      .into_iter()
      .map(|plugin| {
        let app = app.clone();
        tokio::spawn(supervise(plugin, app, stop.clone(), self.restart_delay))
      })
      .collect();

    Running { shutdown, tasks }
  }
}

async fn supervise(
  plugin: Arc<dyn Plugin>,
  app: Arc<AppState>,
  mut stop: watch::Receiver<bool>,
  restart_delay: Duration,
) {
  let name = plugin.name();
  info!("Plugin `{name}` started");

  loop {
    let mut handle = tokio::spawn({
      let plugin = plugin.clone();
      let app = app.clone();
      async move { plugin.start(app).await }
    });

    let outcome = tokio::select! {
      outcome = &mut handle => outcome,
      _ = stopped(&mut stop) => {
        handle.abort();
        handle.await
      }
    };

    match outcome {
      Ok(Ok(())) => warn!("Plugin `{name}` returned, restarting"),
      Ok(Err(err)) => error!("Plugin `{name}` failed: {err:#}"),
      Err(err) if err.is_cancelled() => {
        info!("Plugin `{name}` stopped");
        return;
      }
      Err(_) => error!("Plugin `{name}` panicked"),
    }

    tokio::select! {
      _ = tokio::time::sleep(restart_delay) => {}
      _ = stopped(&mut stop) => {
        info!("Plugin `{name}` stopped");
        return;
      }
    }
  }
}

/// Resolves once shutdown is requested or the sender is gone
async fn stopped(stop: &mut watch::Receiver<bool>) {
  let _ = stop.wait_for(|stop| *stop).await;
}

pub struct Running {
  shutdown: watch::Sender<bool>,
  tasks: Vec<JoinHandle<()>>,
}

impl Running {
  /// Cancels every plugin and waits for the supervisors to exit
  pub async fn shutdown(self) {
    let _ = self.shutdown.send(true);
    for task in self.tasks {
      if let Err(err) = task.await {
        error!("Plugin supervisor failed: {err}");
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use std::sync::atomic::{AtomicUsize, Ordering};

  use super::*;
  use crate::{state::Config, store::memory::Memory};

  fn state() -> Arc<AppState> {
    Arc::new(AppState::with_store(Arc::new(Memory::new()), Config::default()))
  }

  /// Fails on the first start, then idles until cancelled
  struct Flaky {
    starts: Arc<AtomicUsize>,
  }

  #[async_trait]
  impl Plugin for Flaky {
    async fn start(&self, _: Arc<AppState>) -> anyhow::Result<()> {
      if self.starts.fetch_add(1, Ordering::SeqCst) == 0 {
        anyhow::bail!("boom");
      }
      std::future::pending().await
    }
  }

  #[tokio::test]
  async fn test_restarts_failed_plugin() {
    let starts = Arc::new(AtomicUsize::new(0));
    let running = App::new()
      .restart_delay(Duration::from_millis(10))
      .register(Flaky { starts: starts.clone() })
      .run(state());

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(starts.load(Ordering::SeqCst), 2);

    tokio::time::timeout(Duration::from_secs(1), running.shutdown())
      .await
      .unwrap();
    assert_eq!(starts.load(Ordering::SeqCst), 2);
  }

  #[tokio::test]
  async fn test_shutdown_during_restart_delay() {
    struct Failing;

    #[async_trait]
    impl Plugin for Failing {
      async fn start(&self, _: Arc<AppState>) -> anyhow::Result<()> {
        anyhow::bail!("always")
      }
    }

    let running = App::new()
      .restart_delay(Duration::from_secs(3600))
      .register(Failing)
      .run(state());

    tokio::time::sleep(Duration::from_millis(20)).await;
    tokio::time::timeout(Duration::from_secs(1), running.shutdown())
      .await
      .unwrap();
  }
}
