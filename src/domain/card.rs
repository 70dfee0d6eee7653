use crate::domain::{
    id::{CardId, UserId},
    user::deserialize_user_ref,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Priority of a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::High => write!(f, "High"),
            Self::Medium => write!(f, "Medium"),
            Self::Low => write!(f, "Low"),
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            _ => Err(format!(
                "Invalid priority '{}'. Valid priorities: high, medium, low",
                s
            )),
        }
    }
}

/// A task item owned by exactly one column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    #[serde(deserialize_with = "deserialize_user_ref")]
    pub created_by: UserId,
    pub priority: Priority,
    pub due_date: DateTime<Utc>,
    #[serde(deserialize_with = "deserialize_user_ref")]
    pub assigned_to: UserId,
}

/// Caller-supplied fields of a card about to be added
#[derive(Debug, Clone)]
pub struct NewCard {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub due_date: DateTime<Utc>,
    pub assigned_to: UserId,
}

impl NewCard {
    /// A medium-priority card due now, with an empty description
    pub fn new(title: impl Into<String>, assigned_to: impl Into<UserId>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            priority: Priority::default(),
            due_date: Utc::now(),
            assigned_to: assigned_to.into(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = due_date;
        self
    }

    pub(crate) fn into_card(self, created_by: UserId) -> Card {
        Card {
            id: CardId::new(),
            title: self.title,
            description: self.description,
            created_at: Utc::now(),
            created_by,
            priority: self.priority,
            due_date: self.due_date,
            assigned_to: self.assigned_to,
        }
    }
}

/// Partial card update; only `Some` fields are merged
#[derive(Debug, Clone, Default)]
pub struct CardUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub due_date: Option<DateTime<Utc>>,
    pub assigned_to: Option<UserId>,
}

impl CardUpdate {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn assigned_to(mut self, user: impl Into<UserId>) -> Self {
        self.assigned_to = Some(user.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
            && self.assigned_to.is_none()
    }
}

impl Card {
    /// Returns a copy of this card with the update merged in
    pub fn merged(&self, update: &CardUpdate) -> Card {
        Card {
            id: self.id.clone(),
            title: update.title.clone().unwrap_or_else(|| self.title.clone()),
            description: update
                .description
                .clone()
                .unwrap_or_else(|| self.description.clone()),
            created_at: self.created_at,
            created_by: self.created_by.clone(),
            priority: update.priority.unwrap_or(self.priority),
            due_date: update.due_date.unwrap_or(self.due_date),
            assigned_to: update
                .assigned_to
                .clone()
                .unwrap_or_else(|| self.assigned_to.clone()),
        }
    }
}
