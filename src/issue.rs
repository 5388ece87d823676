use std::cmp::Ordering;
use std::sync::LazyLock;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

static IMAGE_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"!\[[^\]]*\]\([^)]*\)").expect("image reference pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub created_at: String,
}

impl Issue {
    /// Milliseconds since the epoch, or `None` when `created_at` is not a
    /// timestamp we understand.
    pub fn created_at_millis(&self) -> Option<i64> {
        parse_timestamp_millis(&self.created_at)
    }

    pub fn has_image(&self) -> bool {
        contains_image(&self.body)
    }

    pub fn short_id(&self) -> String {
        self.id.chars().take(6).collect()
    }

    pub fn opened_on(&self) -> String {
        format!("Opened on {}", format_local_timestamp(&self.created_at))
    }

    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        self.title.to_lowercase().contains(query.as_str())
            || self.body.to_lowercase().contains(query.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewIssue {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Title and description are required.")]
    MissingTitleAndBody,
    #[error("Title is required.")]
    MissingTitle,
    #[error("Description is required.")]
    MissingBody,
}

impl NewIssue {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let title_missing = self.title.trim().is_empty();
        let body_missing = self.body.trim().is_empty();
        match (title_missing, body_missing) {
            (true, true) => Err(ValidationError::MissingTitleAndBody),
            (true, false) => Err(ValidationError::MissingTitle),
            (false, true) => Err(ValidationError::MissingBody),
            (false, false) => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadedImage {
    pub url: String,
}

pub fn contains_image(body: &str) -> bool {
    IMAGE_REFERENCE.is_match(body)
}

pub fn image_markdown(file_name: &str, url: &str) -> String {
    format!("![{}]({})", file_name, url)
}

/// Newest first. Issues without a usable timestamp keep their relative order
/// and go after every dated issue.
pub fn sort_newest_first(issues: &mut [Issue]) {
    issues.sort_by(|left, right| {
        match (left.created_at_millis(), right.created_at_millis()) {
            (Some(left), Some(right)) => right.cmp(&left),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });
}

pub fn parse_timestamp_millis(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(value) = DateTime::parse_from_rfc3339(raw) {
        return Some(value.timestamp_millis());
    }
    if let Ok(value) = raw.parse::<i64>() {
        return Some(value);
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|value| value.and_utc().timestamp_millis())
}

pub fn format_local_timestamp(raw: &str) -> String {
    let millis = match parse_timestamp_millis(raw) {
        Some(millis) => millis,
        None => return raw.to_string(),
    };
    match Utc.timestamp_millis_opt(millis).single() {
        Some(value) => value
            .with_timezone(&Local)
            .format("%b %-d, %Y, %H:%M")
            .to_string(),
        None => raw.to_string(),
    }
}
