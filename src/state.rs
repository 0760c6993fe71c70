use std::{env, sync::Arc};

use migration::{Migrator, MigratorTrait};

use crate::{
  cache::TtlCache,
  prelude::*,
  store::{Db, Store},
  sv,
  sv::progress::{LeaderboardEntry, LeaderboardQuery},
};

#[derive(Debug, Clone)]
pub struct Config {
  pub database_url: String,
  pub port: u16,
  /// How long a leaderboard response is served from memory
  pub cache_ttl: Duration,
  pub cache_gc_interval: Duration,
  pub leaderboard_default_limit: u64,
  pub leaderboard_max_limit: u64,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      database_url: String::from("sqlite:points.db?mode=rwc"),
      port: 3000,
      cache_ttl: Duration::from_secs(5 * 60),
      cache_gc_interval: Duration::from_secs(60),
      leaderboard_default_limit: 10,
      leaderboard_max_limit: 100,
    }
  }
}

impl Config {
  pub fn from_env() -> anyhow::Result<Self> {
    let mut config = Self::default();

    if let Ok(url) = env::var("DATABASE_URL") {
      config.database_url = url;
    }
    if let Ok(port) = env::var("PORT") {
      config.port = port.parse().context("Invalid PORT")?;
    }
    if let Ok(ttl) = env::var("CACHE_TTL") {
      config.cache_ttl =
        humantime::parse_duration(&ttl).context("Invalid CACHE_TTL")?;
    }
    if let Ok(interval) = env::var("CACHE_GC_INTERVAL") {
      config.cache_gc_interval = humantime::parse_duration(&interval)
        .context("Invalid CACHE_GC_INTERVAL")?;
      anyhow::ensure!(
        !config.cache_gc_interval.is_zero(),
        "CACHE_GC_INTERVAL must be positive"
      );
    }
    if let Ok(limit) = env::var("LEADERBOARD_MAX_LIMIT") {
      config.leaderboard_max_limit = parse_limit(&limit)
        .context("Invalid LEADERBOARD_MAX_LIMIT")?;
    }

    Ok(config)
  }
}

/// Limits end up in SQL as signed integers
fn parse_limit(raw: &str) -> anyhow::Result<u64> {
  let limit: u64 = raw.trim().parse()?;
  anyhow::ensure!(
    (1..=MAX_LIMIT).contains(&limit),
    "expected 1..={MAX_LIMIT}, got {limit}"
  );
  Ok(limit)
}

const MAX_LIMIT: u64 = 10_000;

pub struct Services<'a> {
  pub stats: sv::Stats<'a>,
  pub achievements: sv::Achievements<'a>,
  pub progress: sv::Progress<'a>,
}

pub type LeaderboardCache = TtlCache<LeaderboardQuery, Arc<Vec<LeaderboardEntry>>>;

pub struct AppState {
  pub store: Arc<dyn Store>,
  pub config: Config,
  pub leaderboards: LeaderboardCache,
}

impl AppState {
  pub async fn new(config: Config) -> anyhow::Result<Self> {
    info!("Connecting to database...");
    let db = Database::connect(config.database_url.as_str())
      .await
      .context("Failed to connect to database")?;

    info!("Running migrations...");
    Migrator::up(&db, None).await.context("Failed to run migrations")?;

    Ok(Self::with_store(Arc::new(Db::new(db)), config))
  }

  pub fn with_store(store: Arc<dyn Store>, config: Config) -> Self {
    Self {
      store,
      leaderboards: TtlCache::new(config.cache_ttl),
      config,
    }
  }

  pub fn sv(&self) -> Services<'_> {
    let store = self.store.as_ref();
    Services {
      stats: sv::Stats::new(store),
      achievements: sv::Achievements::new(store),
      progress: sv::Progress::new(store),
    }
  }

  /// Cached per query for `cache_ttl`, so fresh points can take that long
  /// to show up on a board.
  pub async fn leaderboard(
    &self,
    query: LeaderboardQuery,
  ) -> Result<Arc<Vec<LeaderboardEntry>>> {
    if let Some(entries) = self.leaderboards.get(&query) {
      return Ok(entries);
    }

    let entries = Arc::new(self.sv().progress.leaderboard(&query).await?);
    self.leaderboards.insert(query, entries.clone());
    Ok(entries)
  }

  pub fn gc_cache(&self) {
    let evicted = self.leaderboards.gc();
    if evicted > 0 {
      debug!(
        "Evicted {evicted} leaderboard cache entries, {} left",
        self.leaderboards.len()
      );
    }
  }
}
