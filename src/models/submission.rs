use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One accepted assessment request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub country: String,
    pub website: String,
    pub visa_categories: VisaCategories,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume: Option<ResumeMeta>,
    pub status: LeadStatus,
    pub submitted_at: DateTime<Utc>,
}

/// A validated submission that the store has not assigned an id to yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSubmission {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub country: String,
    pub website: String,
    pub visa_categories: VisaCategories,
    pub help_text: Option<String>,
    pub resume: Option<ResumeMeta>,
    pub status: LeadStatus,
    pub submitted_at: DateTime<Utc>,
}

impl NewSubmission {
    pub fn with_id(self, id: String) -> Submission {
        Submission {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            country: self.country,
            website: self.website,
            visa_categories: self.visa_categories,
            help_text: self.help_text,
            resume: self.resume,
            status: self.status,
            submitted_at: self.submitted_at,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisaCategories {
    #[serde(rename = "O-1")]
    pub o1: bool,
    #[serde(rename = "EB-1A")]
    pub eb1a: bool,
    #[serde(rename = "EB-2-NIW")]
    pub eb2_niw: bool,
    pub unknown: bool,
}

impl VisaCategories {
    /// Wire keys in display order.
    pub const KEYS: [&'static str; 4] = ["O-1", "EB-1A", "EB-2-NIW", "unknown"];

    pub fn any_selected(&self) -> bool {
        self.o1 || self.eb1a || self.eb2_niw || self.unknown
    }

    /// Set the flag named by its wire key. Unknown keys are ignored.
    pub fn set(&mut self, key: &str, value: bool) {
        match key {
            "O-1" => self.o1 = value,
            "EB-1A" => self.eb1a = value,
            "EB-2-NIW" => self.eb2_niw = value,
            "unknown" => self.unknown = value,
            _ => {}
        }
    }
}

/// Metadata of an uploaded resume. File contents are never kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeMeta {
    pub name: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub size: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeadStatus {
    #[default]
    Pending,
    #[serde(rename = "Reached Out")]
    ReachedOut,
}
