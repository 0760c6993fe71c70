pub use std::time::Duration;

pub use anyhow::Context;
pub use chrono::{NaiveDate, NaiveDateTime as DateTime, TimeDelta, Utc};
pub use dashmap::DashMap;
pub use sea_orm::{
  ActiveModelTrait, ColumnTrait, Database, DatabaseConnection, EntityTrait,
  PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
pub use tracing::{debug, error, info, warn};
pub use uuid::Uuid;

pub use crate::error::{Error, Result};
