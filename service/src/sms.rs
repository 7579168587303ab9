//! SMS ingestion — parsing the inbound report format.
//!
//! Expected body: `Issue: <title> - <description>`. The title runs up to
//! the first hyphen; both halves are trimmed.

use crate::error::ServiceError;

/// A report parsed out of an SMS body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SmsReport {
    pub title: String,
    pub description: String,
}

/// Parse an SMS body into a report submission.
pub fn parse_sms_report(body: &str) -> Result<SmsReport, ServiceError> {
    let rest = body
        .trim()
        .strip_prefix("Issue:")
        .ok_or(ServiceError::MalformedSmsBody)?;
    let (title, description) = rest.split_once('-').ok_or(ServiceError::MalformedSmsBody)?;

    let title = title.trim();
    let description = description.trim();
    if title.is_empty() || description.is_empty() {
        return Err(ServiceError::MalformedSmsBody);
    }

    Ok(SmsReport {
        title: title.to_string(),
        description: description.to_string(),
    })
}
