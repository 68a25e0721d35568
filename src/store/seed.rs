use chrono::{DateTime, TimeZone, Utc};

use crate::models::{LeadStatus, NewSubmission, VisaCategories};

use super::{StoreError, SubmissionStore};

/// Append the sample leads shown on a fresh dashboard.
///
/// They go through `append` like any other record, so their ids come from
/// the store and cannot collide with later submissions.
pub async fn seed_demo(store: &dyn SubmissionStore) -> Result<usize, StoreError> {
    let leads = demo_leads();
    let count = leads.len();
    for lead in leads {
        store.append(lead).await?;
    }
    tracing::info!("Seeded {count} demo leads");
    Ok(count)
}

fn demo_leads() -> Vec<NewSubmission> {
    let submitted_at: DateTime<Utc> = Utc
        .with_ymd_and_hms(2024, 2, 2, 14, 45, 0)
        .single()
        .unwrap_or_else(Utc::now);
    let help_text =
        Some("I am a software engineer and I want to work in the United States.".to_string());
    let visa_categories = VisaCategories {
        o1: true,
        ..Default::default()
    };

    vec![
        NewSubmission {
            first_name: "Jorge".to_string(),
            last_name: "Ruiz".to_string(),
            email: "jorge.ruiz@example.com".to_string(),
            country: "Mexico".to_string(),
            website: "https://www.jorge-ruiz.com".to_string(),
            visa_categories,
            help_text: help_text.clone(),
            resume: None,
            status: LeadStatus::Pending,
            submitted_at,
        },
        NewSubmission {
            first_name: "Bahar".to_string(),
            last_name: "Zamir".to_string(),
            email: "bahar.zamir@example.com".to_string(),
            country: "Mexico".to_string(),
            website: "https://www.bahar-zamir.com".to_string(),
            visa_categories,
            help_text,
            resume: None,
            status: LeadStatus::ReachedOut,
            submitted_at,
        },
    ]
}
