use {
    crate::domain::admin::ReviewDraft,
    crate::domain::error::PipelineError,
    crate::infra::postgres::review_repo,
    chrono::{DateTime, NaiveDate, NaiveDateTime, Utc},
    serde::{Deserialize, Serialize},
    sqlx::PgPool,
};

#[derive(Debug, Serialize)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
}

/// One raw CSV record. Every column is optional text; interpretation is
/// deliberately permissive.
#[derive(Debug, Deserialize)]
struct RawRow {
    customer_name: Option<String>,
    customer_email: Option<String>,
    rating: Option<String>,
    title: Option<String>,
    review_text: Option<String>,
    product_id: Option<String>,
    date: Option<String>,
    verified_buyer: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn parse_truthy(value: Option<&str>) -> bool {
    matches!(
        value.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("true") | Some("1") | Some("yes") | Some("y")
    )
}

/// Accepts RFC 3339 plus the date shapes spreadsheets usually produce.
/// Anything unparseable falls back to "now" at insert time.
fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.and_utc());
    }
    for fmt in ["%Y-%m-%d", "%m/%d/%Y", "%d.%m.%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(value, fmt) {
            return Some(d.and_hms_opt(0, 0, 0)?.and_utc());
        }
    }
    None
}

fn row_to_draft(row: RawRow) -> Option<ReviewDraft> {
    let customer_name = non_empty(row.customer_name)?;
    let rating: i32 = row.rating.as_deref()?.trim().parse().ok()?;

    let draft = ReviewDraft {
        // Empty product_id means a general testimonial.
        product_id: non_empty(row.product_id),
        customer_name,
        customer_email: non_empty(row.customer_email),
        rating,
        title: non_empty(row.title),
        body: non_empty(row.review_text),
        is_verified_buyer: parse_truthy(row.verified_buyer.as_deref()),
        submitted_at: row.date.as_deref().and_then(parse_date),
    };

    draft.validate().ok()?;
    Some(draft)
}

/// Parse a CSV document (header row required) into review drafts. Rows that
/// cannot be made sense of are dropped and counted, never fatal.
pub fn parse_review_csv(data: &[u8]) -> (Vec<ReviewDraft>, usize) {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(data);

    let mut drafts = Vec::new();
    let mut skipped = 0usize;

    for record in reader.deserialize::<RawRow>() {
        match record {
            Ok(row) => match row_to_draft(row) {
                Some(draft) => drafts.push(draft),
                None => skipped += 1,
            },
            Err(e) => {
                tracing::warn!(error = %e, "unreadable review row, skipping");
                skipped += 1;
            }
        }
    }

    (drafts, skipped)
}

pub async fn import_reviews(pool: &PgPool, data: &[u8]) -> Result<ImportSummary, PipelineError> {
    let (drafts, mut skipped) = parse_review_csv(data);
    let mut imported = 0usize;

    for draft in &drafts {
        match review_repo::insert_review(pool, draft).await {
            Ok(_) => imported += 1,
            Err(e) => {
                tracing::warn!(error = %e, "review insert failed, skipping row");
                skipped += 1;
            }
        }
    }

    tracing::info!(imported, skipped, "review import finished");
    Ok(ImportSummary { imported, skipped })
}
