//! Validated construction of a new report.

use crate::error::VerificationError;
use civis_types::{Category, PhoneNumber, PolicyParams, Report, ReportId, ReportStatus, Timestamp};

/// Build a new report after validating the submission constraints.
///
/// Title and description are trimmed before the length checks; the category
/// arrives already typed (string parsing happens at the wire boundary).
pub fn build_report(
    id: ReportId,
    title: &str,
    description: &str,
    category: Category,
    created_by: PhoneNumber,
    now: Timestamp,
    params: &PolicyParams,
) -> Result<Report, VerificationError> {
    let title = title.trim();
    let description = description.trim();

    let title_len = title.chars().count();
    if title_len < params.min_title_len {
        return Err(VerificationError::TitleTooShort {
            len: title_len,
            min: params.min_title_len,
        });
    }
    let description_len = description.chars().count();
    if description_len < params.min_description_len {
        return Err(VerificationError::DescriptionTooShort {
            len: description_len,
            min: params.min_description_len,
        });
    }

    Ok(Report {
        id,
        title: title.to_string(),
        description: description.to_string(),
        category,
        created_by,
        created_at: now,
        verified_by: Vec::new(),
        verification_timestamps: Vec::new(),
        verification_count: 0,
        verified: false,
        verified_at: None,
        status: ReportStatus::Pending,
        comments: Vec::new(),
    })
}
