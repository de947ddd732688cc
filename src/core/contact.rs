use crate::core::resolver::ContentResolver;
use crate::domain::model::{ContactReceipt, ContactSubmission};
use crate::utils::error::Result;
use crate::utils::validation::require_fields;
use chrono::Utc;
use uuid::Uuid;

/// Stores a contact form submission. Unlike reads, failures reach the caller:
/// a lost enquiry has no safe fallback.
pub async fn submit_contact(
    resolver: &ContentResolver,
    submission: &ContactSubmission,
) -> Result<ContactReceipt> {
    require_fields(
        &[
            Some(submission.name.as_str()),
            Some(submission.email.as_str()),
            Some(submission.message.as_str()),
        ],
        "Name, email and message are required",
    )?;

    let Some(source) = resolver.source() else {
        tracing::info!("📝 Mock contact submission from {}", submission.email);
        return Ok(ContactReceipt {
            id: None,
            mock: true,
        });
    };

    let id = Uuid::new_v4().to_string();
    let mut row = serde_json::to_value(submission)?;
    if let Some(fields) = row.as_object_mut() {
        fields.insert("id".to_string(), id.clone().into());
        fields.insert("timestamp".to_string(), Utc::now().to_rfc3339().into());
    }

    if let Err(e) = source.insert("contacts", row).await {
        tracing::error!("Error submitting contact form: {}", e);
        return Err(e);
    }

    Ok(ContactReceipt {
        id: Some(id),
        mock: false,
    })
}
