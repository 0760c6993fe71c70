//! Static achievement catalog
//!
//! Entries are evaluated in declaration order, new achievements are added
//! here without touching the evaluator.

use serde::Serialize;

use crate::sv::stats::UserStats;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
  Upload,
  Curation,
  Engagement,
  Milestone,
  Social,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
  Common,
  Rare,
  Epic,
  Legendary,
}

/// Counters of [`UserStats`] a count criterion can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stat {
  Uploads,
  Collections,
  TotalUpvotes,
  TotalDownloads,
  DownloadsMade,
  MaxResourceUpvotes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Criteria {
  Count { stat: Stat, target: i64 },
  Points { target: i64 },
  Streak { days: i64 },
}

impl Criteria {
  pub fn is_met(&self, stats: &UserStats) -> bool {
    match *self {
      Criteria::Count { stat, target } => stats.get(stat) >= target,
      Criteria::Points { target } => stats.total_points >= target,
      Criteria::Streak { days } => stats.consecutive_days >= days,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Achievement {
  pub id: &'static str,
  pub title: &'static str,
  pub description: &'static str,
  pub icon: &'static str,
  /// Bonus credited to the user when granted
  pub points: i64,
  pub category: Category,
  pub criteria: Criteria,
  pub rarity: Rarity,
}

pub static CATALOG: [Achievement; 12] = [
  Achievement {
    id: "first_upload",
    title: "First Steps",
    description: "Upload your first resource",
    icon: "📤",
    points: 10,
    category: Category::Upload,
    criteria: Criteria::Count { stat: Stat::Uploads, target: 1 },
    rarity: Rarity::Common,
  },
  Achievement {
    id: "prolific_uploader",
    title: "Prolific Uploader",
    description: "Upload 10 resources",
    icon: "📚",
    points: 50,
    category: Category::Upload,
    criteria: Criteria::Count { stat: Stat::Uploads, target: 10 },
    rarity: Rarity::Rare,
  },
  Achievement {
    id: "content_creator",
    title: "Content Creator",
    description: "Upload 50 resources",
    icon: "🏗️",
    points: 200,
    category: Category::Upload,
    criteria: Criteria::Count { stat: Stat::Uploads, target: 50 },
    rarity: Rarity::Epic,
  },
  Achievement {
    id: "first_collection",
    title: "Organizer",
    description: "Create your first collection",
    icon: "🗂️",
    points: 15,
    category: Category::Curation,
    criteria: Criteria::Count { stat: Stat::Collections, target: 1 },
    rarity: Rarity::Common,
  },
  Achievement {
    id: "curator",
    title: "Curator",
    description: "Create 5 collections",
    icon: "🏛️",
    points: 75,
    category: Category::Curation,
    criteria: Criteria::Count { stat: Stat::Collections, target: 5 },
    rarity: Rarity::Rare,
  },
  Achievement {
    id: "popular_content",
    title: "Crowd Pleaser",
    description: "Get 10 upvotes on a single resource",
    icon: "⭐",
    points: 30,
    category: Category::Engagement,
    criteria: Criteria::Count { stat: Stat::MaxResourceUpvotes, target: 10 },
    rarity: Rarity::Common,
  },
  Achievement {
    id: "community_favorite",
    title: "Community Favorite",
    description: "Receive 100 upvotes across your resources",
    icon: "❤️",
    points: 150,
    category: Category::Engagement,
    criteria: Criteria::Count { stat: Stat::TotalUpvotes, target: 100 },
    rarity: Rarity::Epic,
  },
  Achievement {
    id: "helpful_contributor",
    title: "Helpful Contributor",
    description: "Have your resources downloaded 50 times",
    icon: "🤝",
    points: 100,
    category: Category::Social,
    criteria: Criteria::Count { stat: Stat::TotalDownloads, target: 50 },
    rarity: Rarity::Rare,
  },
  Achievement {
    id: "active_learner",
    title: "Active Learner",
    description: "Download 20 resources",
    icon: "🎓",
    points: 40,
    category: Category::Social,
    criteria: Criteria::Count { stat: Stat::DownloadsMade, target: 20 },
    rarity: Rarity::Common,
  },
  Achievement {
    id: "week_streak",
    title: "On a Roll",
    description: "Be active 7 days in a row",
    icon: "🔥",
    points: 70,
    category: Category::Engagement,
    criteria: Criteria::Streak { days: 7 },
    rarity: Rarity::Rare,
  },
  Achievement {
    id: "month_streak",
    title: "Unstoppable",
    description: "Be active 30 days in a row",
    icon: "⚡",
    points: 300,
    category: Category::Engagement,
    criteria: Criteria::Streak { days: 30 },
    rarity: Rarity::Epic,
  },
  Achievement {
    id: "point_master",
    title: "Master Scholar",
    description: "Earn 1000 points",
    icon: "👑",
    points: 500,
    category: Category::Milestone,
    criteria: Criteria::Points { target: 1000 },
    rarity: Rarity::Legendary,
  },
];

pub fn by_id(id: &str) -> Option<&'static Achievement> {
  CATALOG.iter().find(|achievement| achievement.id == id)
}
