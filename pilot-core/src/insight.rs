//! Insight records produced by the rule engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    Alert,
    Suggestion,
    Projection,
}

impl InsightKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightKind::Alert => "alert",
            InsightKind::Suggestion => "suggestion",
            InsightKind::Projection => "projection",
        }
    }
}

impl fmt::Display for InsightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Ordering follows urgency: `High < Medium < Low`, so an ascending sort puts
/// the most urgent insight first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High = 0,
    Medium = 1,
    Low = 2,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightStatus {
    #[default]
    Pending,
    Resolved,
}

impl InsightStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightStatus::Pending => "pending",
            InsightStatus::Resolved => "resolved",
        }
    }
}

impl fmt::Display for InsightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InsightStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(InsightStatus::Pending),
            "resolved" => Ok(InsightStatus::Resolved),
            _ => Err(format!("Unknown insight status: {}", s)),
        }
    }
}

/// A generated, human-readable alert or suggestion (before persistence).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    /// `"{company_id}:{rule_key}"`, stable across regenerations
    pub id: String,
    /// Opaque to the engine
    pub company_id: String,
    pub kind: InsightKind,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    #[serde(default)]
    pub status: InsightStatus,
}

impl Insight {
    pub fn new(
        company_id: &str,
        rule_key: &str,
        kind: InsightKind,
        priority: Priority,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: format!("{}:{}", company_id, rule_key),
            company_id: company_id.to_string(),
            kind,
            title: title.into(),
            description: description.into(),
            priority,
            status: InsightStatus::Pending,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == InsightStatus::Pending
    }

    pub fn resolve(&mut self) {
        self.status = InsightStatus::Resolved;
    }
}
