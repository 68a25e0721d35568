use std::sync::LazyLock;

use chrono::Utc;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::models::{LeadStatus, NewSubmission, ResumeMeta, VisaCategories};

use super::parser::{RawPayload, ResumeField};

pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 50;
pub const HELP_TEXT_MAX_CHARS: usize = 1000;
pub const RESUME_MAX_BYTES: u64 = 5 * 1024 * 1024;

pub const RESUME_MIME_TYPES: [&str; 3] = [
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

// Scheme optional so "linkedin.com/in/someone" is accepted.
static WEBSITE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i:https?://)?([A-Za-z0-9-]+\.)+[A-Za-z]{2,}(:\d{1,5})?([/?#]\S*)?$").unwrap()
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Check a raw payload and produce a normalized record.
///
/// Every field is checked; errors from different fields accumulate, while
/// within one field only the first failing rule is reported. String fields
/// are trimmed, an empty `helpText` becomes `None`, and the record is
/// stamped `Pending` with the current time.
pub fn validate(payload: &RawPayload) -> Result<NewSubmission, Vec<FieldError>> {
    let fields = &payload.fields;
    let mut errors = Vec::new();

    let first_name = check_name(&mut errors, fields, "firstName", "First name");
    let last_name = check_name(&mut errors, fields, "lastName", "Last name");

    let email = match text(fields, "email") {
        None => {
            errors.push(FieldError::new("email", "Email is required"));
            None
        }
        Some(s) if !EMAIL_RE.is_match(s) => {
            errors.push(FieldError::new("email", "Please enter a valid email address"));
            None
        }
        Some(s) => Some(s),
    };

    let country = text(fields, "country");
    if country.is_none() {
        errors.push(FieldError::new("country", "Country is required"));
    }

    let website = match text(fields, "website") {
        None => {
            errors.push(FieldError::new("website", "Website is required"));
            None
        }
        Some(s) if !WEBSITE_RE.is_match(s) => {
            errors.push(FieldError::new("website", "Please enter a valid URL"));
            None
        }
        Some(s) => Some(s),
    };

    let help_text = text(fields, "helpText");
    if help_text.is_some_and(|s| s.chars().count() > HELP_TEXT_MAX_CHARS) {
        errors.push(FieldError::new(
            "helpText",
            format!("Help text must not exceed {HELP_TEXT_MAX_CHARS} characters"),
        ));
    }

    let resume = match &payload.resume {
        ResumeField::Absent => None,
        ResumeField::Malformed => {
            errors.push(FieldError::new("resume", "Resume must be a PDF, DOC, or DOCX file"));
            None
        }
        ResumeField::Upload(meta) => {
            check_resume(&mut errors, meta);
            Some(meta.clone())
        }
    };

    let visa_categories = visa_categories(fields);
    if !visa_categories.any_selected() {
        errors.push(FieldError::new(
            "visaCategories",
            "Please select at least one visa category or \"I don't know\"",
        ));
    }

    match (first_name, last_name, email, country, website) {
        (Some(first_name), Some(last_name), Some(email), Some(country), Some(website))
            if errors.is_empty() =>
        {
            Ok(NewSubmission {
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                email: email.to_string(),
                country: country.to_string(),
                website: website.to_string(),
                visa_categories,
                help_text: help_text.map(str::to_string),
                resume,
                status: LeadStatus::Pending,
                submitted_at: Utc::now(),
            })
        }
        _ => Err(errors),
    }
}

/// Trimmed, non-empty string value. Non-string values count as missing.
fn text<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn check_name<'a>(
    errors: &mut Vec<FieldError>,
    fields: &'a Map<String, Value>,
    field: &str,
    label: &str,
) -> Option<&'a str> {
    let Some(value) = text(fields, field) else {
        errors.push(FieldError::new(field, format!("{label} is required")));
        return None;
    };

    let len = value.chars().count();
    if len < NAME_MIN_CHARS {
        errors.push(FieldError::new(
            field,
            format!("{label} must be at least {NAME_MIN_CHARS} characters"),
        ));
        return None;
    }
    if len > NAME_MAX_CHARS {
        errors.push(FieldError::new(
            field,
            format!("{label} must not exceed {NAME_MAX_CHARS} characters"),
        ));
        return None;
    }

    Some(value)
}

fn check_resume(errors: &mut Vec<FieldError>, meta: &ResumeMeta) {
    let mime = meta.mime_type.trim().to_ascii_lowercase();
    if !RESUME_MIME_TYPES.contains(&mime.as_str()) {
        errors.push(FieldError::new("resume", "Resume must be a PDF, DOC, or DOCX file"));
    }
    if meta.size > RESUME_MAX_BYTES {
        errors.push(FieldError::new("resume", "Resume must not exceed 5MB"));
    }
}

fn visa_categories(fields: &Map<String, Value>) -> VisaCategories {
    let mut categories = VisaCategories::default();
    let Some(obj) = fields.get("visaCategories").and_then(Value::as_object) else {
        return categories;
    };

    for key in VisaCategories::KEYS {
        let selected = match obj.get(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => matches!(s.trim(), "true" | "on" | "1"),
            _ => false,
        };
        categories.set(key, selected);
    }
    categories
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> RawPayload {
        RawPayload::from_value(value).unwrap()
    }

    fn valid() -> Value {
        json!({
            "firstName": "John",
            "lastName": "Doe",
            "email": "john@example.com",
            "country": "USA",
            "website": "https://j.com",
            "visaCategories": { "O-1": true, "EB-1A": false, "EB-2-NIW": false, "unknown": false },
        })
    }

    fn with(key: &str, value: Value) -> RawPayload {
        let mut v = valid();
        v[key] = value;
        payload(v)
    }

    fn errors_for(p: &RawPayload, field: &str) -> Vec<String> {
        validate(p)
            .unwrap_err()
            .into_iter()
            .filter(|e| e.field == field)
            .map(|e| e.message)
            .collect()
    }

    #[test]
    fn accepts_valid_payload() {
        let record = validate(&payload(valid())).unwrap();
        assert_eq!(record.first_name, "John");
        assert_eq!(record.status, LeadStatus::Pending);
        assert!(record.visa_categories.o1);
        assert_eq!(record.help_text, None);
        assert_eq!(record.resume, None);
    }

    #[test]
    fn missing_first_name_is_required() {
        let mut v = valid();
        v.as_object_mut().unwrap().remove("firstName");
        assert_eq!(errors_for(&payload(v), "firstName"), vec!["First name is required"]);
    }

    #[test]
    fn non_string_name_counts_as_missing() {
        let p = with("firstName", json!(42));
        assert_eq!(errors_for(&p, "firstName"), vec!["First name is required"]);
    }

    #[test]
    fn name_length_bounds() {
        let p = with("firstName", json!("J"));
        assert_eq!(
            errors_for(&p, "firstName"),
            vec!["First name must be at least 2 characters"]
        );

        let p = with("firstName", json!("a".repeat(51)));
        assert_eq!(
            errors_for(&p, "firstName"),
            vec!["First name must not exceed 50 characters"]
        );

        let p = with("lastName", json!("b".repeat(51)));
        assert_eq!(
            errors_for(&p, "lastName"),
            vec!["Last name must not exceed 50 characters"]
        );

        for len in [2, 25, 50] {
            assert!(validate(&with("firstName", json!("a".repeat(len)))).is_ok());
        }
    }

    #[test]
    fn name_length_counts_characters_after_trim() {
        assert!(validate(&with("lastName", json!("  Li  "))).is_ok());
        assert!(validate(&with("lastName", json!("é".repeat(50)))).is_ok());

        let p = with("lastName", json!(" L "));
        assert_eq!(
            errors_for(&p, "lastName"),
            vec!["Last name must be at least 2 characters"]
        );
    }

    #[test]
    fn email_pattern() {
        let p = with("email", json!("invalid-email"));
        assert_eq!(errors_for(&p, "email"), vec!["Please enter a valid email address"]);

        assert!(validate(&with("email", json!("a@b.co"))).is_ok());

        let p = with("email", json!("   "));
        assert_eq!(errors_for(&p, "email"), vec!["Email is required"]);
    }

    #[test]
    fn website_scheme_is_optional() {
        assert!(validate(&with("website", json!("linkedin.com/in/john-doe"))).is_ok());
        assert!(validate(&with("website", json!("http://www.example.org:8080/x?y=1"))).is_ok());

        let p = with("website", json!("not a url"));
        assert_eq!(errors_for(&p, "website"), vec!["Please enter a valid URL"]);
    }

    #[test]
    fn no_visa_category_selected() {
        let p = with(
            "visaCategories",
            json!({ "O-1": false, "EB-1A": false, "EB-2-NIW": false, "unknown": false }),
        );
        let messages = errors_for(&p, "visaCategories");
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("Please select at least one visa category or \"I don't know\""));

        let mut v = valid();
        v.as_object_mut().unwrap().remove("visaCategories");
        assert_eq!(errors_for(&payload(v), "visaCategories").len(), 1);
    }

    #[test]
    fn form_encoded_visa_flags_are_read() {
        let mut v = valid();
        v.as_object_mut().unwrap().remove("visaCategories");
        v["visaCategories[O-1]"] = json!("false");
        v["visaCategories[unknown]"] = json!("true");

        let record = validate(&payload(v)).unwrap();
        assert!(record.visa_categories.unknown);
        assert!(!record.visa_categories.o1);
    }

    #[test]
    fn help_text_limit_and_normalization() {
        let record = validate(&with("helpText", json!("x".repeat(1000)))).unwrap();
        assert_eq!(record.help_text.map(|s| s.chars().count()), Some(1000));

        let p = with("helpText", json!("x".repeat(1001)));
        assert_eq!(
            errors_for(&p, "helpText"),
            vec!["Help text must not exceed 1000 characters"]
        );

        let record = validate(&with("helpText", json!("   "))).unwrap();
        assert_eq!(record.help_text, None);

        let record = validate(&with("helpText", json!("  Need an O-1  "))).unwrap();
        assert_eq!(record.help_text.as_deref(), Some("Need an O-1"));
    }

    #[test]
    fn resume_checks_are_independent() {
        let p = with("resume", json!({ "name": "me.png", "type": "image/png", "size": 100 }));
        assert_eq!(
            errors_for(&p, "resume"),
            vec!["Resume must be a PDF, DOC, or DOCX file"]
        );

        let p = with(
            "resume",
            json!({ "name": "cv.pdf", "type": "application/pdf", "size": RESUME_MAX_BYTES + 1 }),
        );
        assert_eq!(errors_for(&p, "resume"), vec!["Resume must not exceed 5MB"]);

        let p = with(
            "resume",
            json!({ "name": "me.png", "type": "image/png", "size": RESUME_MAX_BYTES + 1 }),
        );
        assert_eq!(errors_for(&p, "resume").len(), 2);

        let p = with(
            "resume",
            json!({ "name": "cv.docx", "type": RESUME_MIME_TYPES[2], "size": RESUME_MAX_BYTES }),
        );
        assert_eq!(validate(&p).unwrap().resume.unwrap().name, "cv.docx");
    }

    #[test]
    fn errors_accumulate_across_fields_in_order() {
        let errors = validate(&payload(json!({
            "firstName": "J",
            "lastName": "L".repeat(51),
            "email": "nope",
            "helpText": "x".repeat(1001),
            "resume": { "name": "me.png", "type": "image/png", "size": 10 },
        })))
        .unwrap_err();

        let pairs: Vec<(&str, &str)> = errors
            .iter()
            .map(|e| (e.field.as_str(), e.message.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("firstName", "First name must be at least 2 characters"),
                ("lastName", "Last name must not exceed 50 characters"),
                ("email", "Please enter a valid email address"),
                ("country", "Country is required"),
                ("website", "Website is required"),
                ("helpText", "Help text must not exceed 1000 characters"),
                ("resume", "Resume must be a PDF, DOC, or DOCX file"),
                (
                    "visaCategories",
                    "Please select at least one visa category or \"I don't know\""
                ),
            ]
        );
    }

    #[test]
    fn empty_object_reports_every_required_field() {
        let errors = validate(&payload(json!({}))).unwrap_err();
        let pairs: Vec<(&str, &str)> = errors
            .iter()
            .map(|e| (e.field.as_str(), e.message.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("firstName", "First name is required"),
                ("lastName", "Last name is required"),
                ("email", "Email is required"),
                ("country", "Country is required"),
                ("website", "Website is required"),
                (
                    "visaCategories",
                    "Please select at least one visa category or \"I don't know\""
                ),
            ]
        );
    }

    #[test]
    fn absent_keys_are_required() {
        for (key, message) in [
            ("email", "Email is required"),
            ("country", "Country is required"),
            ("website", "Website is required"),
            ("lastName", "Last name is required"),
        ] {
            let mut v = valid();
            v.as_object_mut().unwrap().remove(key);
            assert_eq!(errors_for(&payload(v), key), vec![message]);
        }

        let p = with("country", json!(""));
        assert_eq!(errors_for(&p, "country"), vec!["Country is required"]);
        let p = with("website", json!("  "));
        assert_eq!(errors_for(&p, "website"), vec!["Website is required"]);
    }

    #[test]
    fn strings_are_trimmed() {
        let record = validate(&with("country", json!("  Mexico "))).unwrap();
        assert_eq!(record.country, "Mexico");
    }
}
