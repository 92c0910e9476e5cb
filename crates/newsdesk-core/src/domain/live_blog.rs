use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::truncate_to_micros;
use crate::error::DomainError;

const MAX_SLUG_LEN: usize = 120;

/// Live blog - a single ongoing-coverage document made of timeline entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveBlog {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub excerpt: Option<String>,
    pub summary: Option<String>,
    pub is_live: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update applied by an editor. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct LiveBlogPatch {
    pub title: Option<String>,
    pub excerpt: Option<String>,
    pub summary: Option<String>,
    pub is_live: Option<bool>,
}

impl LiveBlog {
    /// Create a new live blog. Coverage always starts live.
    pub fn new(
        slug: String,
        title: String,
        excerpt: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        validate_slug(&slug)?;
        if title.trim().is_empty() {
            return Err(DomainError::Validation("Title must not be empty".to_string()));
        }

        let now = truncate_to_micros(now);
        Ok(Self {
            id: Uuid::new_v4(),
            slug,
            title,
            excerpt,
            summary: None,
            is_live: true,
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply an editorial patch.
    ///
    /// Ending coverage is one-directional: an ended blog cannot be set live again.
    pub fn apply(&mut self, patch: LiveBlogPatch, now: DateTime<Utc>) -> Result<(), DomainError> {
        if let Some(title) = &patch.title {
            if title.trim().is_empty() {
                return Err(DomainError::Validation("Title must not be empty".to_string()));
            }
        }
        if patch.is_live == Some(true) && !self.is_live {
            return Err(DomainError::Conflict(format!(
                "Live blog '{}' has ended and cannot be reopened",
                self.slug
            )));
        }

        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(excerpt) = patch.excerpt {
            self.excerpt = Some(excerpt);
        }
        if let Some(summary) = patch.summary {
            self.summary = Some(summary);
        }
        if patch.is_live == Some(false) {
            self.is_live = false;
        }
        self.touch(now);
        Ok(())
    }

    /// Record a mutation at `now`. `updated_at` never moves backward.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = self.updated_at.max(truncate_to_micros(now));
    }

    /// The recap to hand to readers, if coverage has ended and one was written.
    pub fn recap(&self) -> Option<&str> {
        if self.is_live {
            return None;
        }
        self.summary.as_deref().filter(|s| !s.trim().is_empty())
    }
}

/// Slugs are lowercase ASCII words separated by single hyphens.
pub fn validate_slug(slug: &str) -> Result<(), DomainError> {
    let well_formed = !slug.is_empty()
        && slug.len() <= MAX_SLUG_LEN
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');

    if well_formed {
        Ok(())
    } else {
        Err(DomainError::Validation(format!("Invalid slug: '{}'", slug)))
    }
}
