//! crates/promail_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any storage format beyond the serde
//! derives needed to round-trip them through the profile store.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents the signed-in account, one per profile.
///
/// `points` is the spendable balance and is never observably negative.
/// `last_reset_date` records the day of the most recent free-points grant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub email: String,
    pub points: u32,
    pub last_reset_date: NaiveDate,
    pub is_admin: bool,
}

/// A best-effort geographic annotation on a usage entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// One successful generation, as recorded in the usage log.
///
/// Entries are append-only and immutable once stored. `location` is attached
/// before the first persistence of the entry or not at all; absence is normal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageLogEntry {
    pub timestamp: DateTime<Utc>,
    pub email: String,
    pub language: Language,
    pub tone: Tone,
    pub category: Category,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Coordinates>,
}

/// One application session start, as recorded in the visit log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitLogEntry {
    pub timestamp: DateTime<Utc>,
}

/// The parameters handed to the drafting service for one generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailRequest {
    pub description: String,
    pub language: Language,
    pub tone: Tone,
    pub category: Category,
}

/// The subject/body pair produced by the drafting service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailDraft {
    pub subject: String,
    pub body: String,
}

//=========================================================================================
// Closed Enumerations
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    Arabic,
    English,
    French,
    Spanish,
    German,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tone {
    Professional,
    Friendly,
    Urgent,
    Persuasive,
    Formal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Job Application")]
    JobApplication,
    #[serde(rename = "Meeting Request")]
    MeetingRequest,
    #[serde(rename = "Follow-up")]
    FollowUp,
    Networking,
    Resignation,
    Complaint,
    #[serde(rename = "Thank You")]
    ThankYou,
    #[serde(rename = "General Business")]
    General,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Arabic => "Arabic",
            Language::English => "English",
            Language::French => "French",
            Language::Spanish => "Spanish",
            Language::German => "German",
        }
    }
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Professional => "Professional",
            Tone::Friendly => "Friendly",
            Tone::Urgent => "Urgent",
            Tone::Persuasive => "Persuasive",
            Tone::Formal => "Formal",
        }
    }
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::JobApplication => "Job Application",
            Category::MeetingRequest => "Meeting Request",
            Category::FollowUp => "Follow-up",
            Category::Networking => "Networking",
            Category::Resignation => "Resignation",
            Category::Complaint => "Complaint",
            Category::ThankYou => "Thank You",
            Category::General => "General Business",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_serializes_to_display_strings() {
        let json = serde_json::to_string(&Category::FollowUp).unwrap();
        assert_eq!(json, "\"Follow-up\"");
        let json = serde_json::to_string(&Category::General).unwrap();
        assert_eq!(json, "\"General Business\"");
    }

    #[test]
    fn unknown_enum_values_are_rejected() {
        // Data written by a future version must not parse into the closed set.
        let result: Result<Language, _> = serde_json::from_str("\"Klingon\"");
        assert!(result.is_err());
    }

    #[test]
    fn usage_entry_round_trips_without_location() {
        let entry = UsageLogEntry {
            timestamp: Utc::now(),
            email: "alice@example.com".to_string(),
            language: Language::Arabic,
            tone: Tone::Formal,
            category: Category::JobApplication,
            location: None,
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert!(!json.contains("location"));
        let back: UsageLogEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }
}
