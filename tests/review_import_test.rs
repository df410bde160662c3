use chrono::Datelike;
use order_desk::services::review_import::parse_review_csv;

const HEADER: &str =
    "customer_name,customer_email,rating,title,review_text,product_id,date,verified_buyer\n";

// ── general testimonial ────────────────────────────────────────────────────
// Empty product_id ⇒ not tied to any catalog product.

#[test]
fn empty_product_id_imports_as_general_testimonial() {
    let csv = format!(
        "{HEADER}Jo March,jo@example.com,5,Wonderful,Loved everything about it,,2024-03-05,true\n"
    );
    let (drafts, skipped) = parse_review_csv(csv.as_bytes());

    assert_eq!(skipped, 0);
    assert_eq!(drafts.len(), 1);
    let draft = &drafts[0];
    assert!(draft.is_general_testimonial());
    assert!(draft.product_id.is_none());
    assert!(draft.is_verified_buyer);
    assert_eq!(draft.customer_name, "Jo March");
    assert_eq!(draft.rating, 5);

    let submitted = draft.submitted_at.unwrap();
    assert_eq!((submitted.year(), submitted.month(), submitted.day()), (2024, 3, 5));
}

// ── product review ─────────────────────────────────────────────────────────

#[test]
fn product_id_links_review_to_product() {
    let csv = format!(
        "{HEADER}Meg March,meg@example.com,4,Nice,Good value,prod_candle,2024-01-02,false\n"
    );
    let (drafts, _) = parse_review_csv(csv.as_bytes());

    assert_eq!(drafts[0].product_id.as_deref(), Some("prod_candle"));
    assert!(!drafts[0].is_verified_buyer);
}

// ── permissive dates ───────────────────────────────────────────────────────

#[test]
fn dates_are_parsed_permissively() {
    let csv = format!(
        "{HEADER}\
         A,a@example.com,5,,,,2024-03-05T10:30:00Z,no\n\
         B,b@example.com,4,,,,03/05/2024,no\n\
         C,c@example.com,3,,,,not a date,no\n\
         D,d@example.com,2,,,,,no\n"
    );
    let (drafts, skipped) = parse_review_csv(csv.as_bytes());

    assert_eq!(skipped, 0);
    assert_eq!(drafts.len(), 4);
    assert!(drafts[0].submitted_at.is_some());
    let b = drafts[1].submitted_at.unwrap();
    assert_eq!((b.year(), b.month(), b.day()), (2024, 3, 5));
    // Unparseable and missing dates default to "now" at insert time.
    assert!(drafts[2].submitted_at.is_none());
    assert!(drafts[3].submitted_at.is_none());
}

// ── unusable rows are counted, not fatal ───────────────────────────────────

#[test]
fn bad_rating_rows_are_skipped() {
    let csv = format!(
        "{HEADER}\
         Ok Row,ok@example.com,5,,,,,'\n\
         No Rating,x@example.com,,,,,,false\n\
         Word Rating,y@example.com,five,,,,,false\n\
         Out Of Range,z@example.com,9,,,,,false\n"
    );
    let (drafts, skipped) = parse_review_csv(csv.as_bytes());

    assert_eq!(drafts.len(), 1);
    assert_eq!(drafts[0].customer_name, "Ok Row");
    assert_eq!(skipped, 3);
}

#[test]
fn missing_name_rows_are_skipped() {
    let csv = format!("{HEADER},anon@example.com,5,,,,,false\n");
    let (drafts, skipped) = parse_review_csv(csv.as_bytes());

    assert!(drafts.is_empty());
    assert_eq!(skipped, 1);
}

// ── quoting ────────────────────────────────────────────────────────────────

#[test]
fn quoted_commas_survive_parsing() {
    let csv = format!(
        "{HEADER}Amy March,amy@example.com,5,Stunning,\"Great gift, arrived early\",prod_jam,2024-06-01,yes\n"
    );
    let (drafts, skipped) = parse_review_csv(csv.as_bytes());

    assert_eq!(skipped, 0);
    assert_eq!(drafts[0].body.as_deref(), Some("Great gift, arrived early"));
    assert!(drafts[0].is_verified_buyer);
}

// ── truthiness ─────────────────────────────────────────────────────────────

#[test]
fn verified_buyer_accepts_common_spellings() {
    let csv = format!(
        "{HEADER}\
         A,,5,,,,,true\n\
         B,,5,,,,,1\n\
         C,,5,,,,,yes\n\
         D,,5,,,,,false\n\
         E,,5,,,,,\n"
    );
    let (drafts, _) = parse_review_csv(csv.as_bytes());

    let flags: Vec<bool> = drafts.iter().map(|d| d.is_verified_buyer).collect();
    assert_eq!(flags, vec![true, true, true, false, false]);
}

// The repo substitutes "now" at insert time; the draft itself carries no date.
#[test]
fn rows_without_dates_carry_no_explicit_timestamp() {
    let csv = format!("{HEADER}Beth March,beth@example.com,5,,,,,false\n");
    let (drafts, _) = parse_review_csv(csv.as_bytes());
    assert!(drafts[0].submitted_at.is_none());
}
