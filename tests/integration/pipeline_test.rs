// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{
    default_headers, listing_page, MemoryLedger, ScriptedPage, ScriptedSession, BLANK_HTML,
    LISTING_HTML,
};
use listrs::domain::schema::ExtractionSchema;
use listrs::domain::services::contact_probe::ContactProbe;
use listrs::domain::services::listing_resolver::{ListingResolver, ResolverTimings};
use listrs::workers::pipeline::{BatchPipeline, PipelineError, PipelineOptions};
use listrs::domain::repositories::ledger_store::LedgerError;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

const LISTING_A: &str = "https://www.zameen.com/Property/a.html";
const LISTING_B: &str = "https://www.zameen.com/Property/b.html";

fn pipeline(
    ledger: Arc<MemoryLedger>,
    session: ScriptedSession,
) -> BatchPipeline<MemoryLedger, ScriptedSession> {
    let resolver = ListingResolver::new(
        session,
        ExtractionSchema::default(),
        ContactProbe::default(),
        ResolverTimings::default(),
    );
    BatchPipeline::new(ledger, resolver, PipelineOptions::default())
}

#[tokio::test(start_paused = true)]
async fn test_done_row_commits_fields_then_status() {
    let ledger = Arc::new(MemoryLedger::new(&default_headers(), &[(LISTING_A, "")]));
    let mut pipeline = pipeline(ledger.clone(), ScriptedSession::new().with_page(LISTING_A, listing_page()));

    let summary = pipeline.run().await.expect("Run failed");

    assert_eq!(summary.done, 1);
    assert_eq!(ledger.cell(2, "Status"), "Done");
    assert_eq!(ledger.cell(2, "Price"), "PKR 1.5 Crore");
    assert_eq!(ledger.cell(2, "Marla Size"), "5.0");
    assert_eq!(ledger.cell(2, "Bedrooms"), "3");
    assert_eq!(ledger.cell(2, "Location"), "DHA Phase 6, Lahore");
    assert_eq!(ledger.cell(2, "Agent Name"), "Ali Raza");
    assert_eq!(ledger.cell(2, "Agency Name"), "Prime Estates");
    assert_eq!(ledger.cell(2, "Phone Number"), "+92 300 1234567");

    let scraped_on = ledger.cell(2, "Scraped On");
    assert!(
        chrono::NaiveDateTime::parse_from_str(&scraped_on, "%Y-%m-%d %H:%M:%S").is_ok(),
        "unexpected timestamp {}",
        scraped_on
    );

    // Status is the last cell written for the row
    let writes = ledger.writes_for_row(2);
    let last = writes.last().unwrap();
    assert_eq!(last.column, 2);
    assert_eq!(last.value, "Done");
    assert_eq!(writes.iter().filter(|w| w.column == 2).count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_fields_without_column_are_dropped() {
    let ledger = Arc::new(MemoryLedger::new(&["URL", "Status", "Price"], &[(LISTING_A, "Pending")]));
    let mut pipeline = pipeline(ledger.clone(), ScriptedSession::new().with_page(LISTING_A, listing_page()));

    pipeline.run().await.expect("Run failed");

    let writes = ledger.writes();
    assert_eq!(writes.len(), 2);
    assert_eq!((writes[0].column, writes[0].value.as_str()), (3, "PKR 1.5 Crore"));
    assert_eq!((writes[1].column, writes[1].value.as_str()), (2, "Done"));
}

#[tokio::test(start_paused = true)]
async fn test_readiness_timeout_writes_only_failed_status() {
    let ledger = Arc::new(MemoryLedger::new(&default_headers(), &[(LISTING_A, "")]));
    let session = ScriptedSession::new().with_page(LISTING_A, ScriptedPage::new(BLANK_HTML));
    let mut pipeline = pipeline(ledger.clone(), session);

    let summary = pipeline.run().await.expect("Run failed");

    assert_eq!(summary.failed, 1);
    let writes = ledger.writes();
    assert_eq!(writes.len(), 1);
    assert_eq!((writes[0].row, writes[0].column), (2, 2));
    assert_eq!(writes[0].value, "Failed");
    assert_eq!(ledger.cell(2, "Price"), "");
}

#[tokio::test(start_paused = true)]
async fn test_empty_url_is_skipped_without_pacing() {
    let ledger = Arc::new(MemoryLedger::new(&default_headers(), &[("", ""), ("  ", "Pending")]));
    let mut pipeline = pipeline(ledger.clone(), ScriptedSession::new());
    let start = Instant::now();

    let summary = pipeline.run().await.expect("Run failed");

    assert_eq!(summary.skipped, 2);
    assert_eq!(start.elapsed(), Duration::ZERO);
    assert!(ledger.writes().is_empty());
    assert!(pipeline.into_resolver().session().navigations.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_pacing_follows_each_processed_row() {
    let ledger = Arc::new(MemoryLedger::new(
        &default_headers(),
        &[(LISTING_A, ""), (LISTING_B, "")],
    ));
    let session = ScriptedSession::new()
        .with_page(LISTING_A, ScriptedPage::new(BLANK_HTML))
        .with_page(LISTING_B, ScriptedPage::new(BLANK_HTML));
    let mut pipeline = pipeline(ledger, session);
    let start = Instant::now();

    pipeline.run().await.expect("Run failed");

    // Two readiness timeouts, each followed by the 8s pause
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_secs(2 * (40 + 8)));
    assert!(elapsed < Duration::from_secs(2 * (40 + 8) + 1));
}

#[tokio::test(start_paused = true)]
async fn test_contact_failure_still_commits_other_fields() {
    let ledger = Arc::new(MemoryLedger::new(&default_headers(), &[(LISTING_A, "")]));
    let page = ScriptedPage::new(LISTING_HTML).never_clickable();
    let mut pipeline = pipeline(ledger.clone(), ScriptedSession::new().with_page(LISTING_A, page));

    let summary = pipeline.run().await.expect("Run failed");

    assert_eq!(summary.done, 1);
    assert_eq!(ledger.cell(2, "Status"), "Done");
    assert_eq!(ledger.cell(2, "Price"), "PKR 1.5 Crore");
    assert_eq!(ledger.cell(2, "Agent Name"), "");
    assert_eq!(ledger.cell(2, "Agency Name"), "");
    assert_eq!(ledger.cell(2, "Phone Number"), "");
}

#[tokio::test(start_paused = true)]
async fn test_rerun_skips_done_and_retries_failed() {
    let ledger = Arc::new(MemoryLedger::new(
        &default_headers(),
        &[(LISTING_A, ""), (LISTING_B, "")],
    ));
    // B is unreachable on the first run
    let session = ScriptedSession::new().with_page(LISTING_A, listing_page());
    let mut first = pipeline(ledger.clone(), session);

    let summary = first.run().await.expect("First run failed");
    assert_eq!((summary.done, summary.failed), (1, 1));
    assert_eq!(ledger.cell(2, "Status"), "Done");
    assert_eq!(ledger.cell(3, "Status"), "Failed");

    let mut session = first.into_resolver().into_session();
    session.add_page(LISTING_B, listing_page());
    ledger.clear_writes();

    let mut second = pipeline(ledger.clone(), session);
    let summary = second.run().await.expect("Second run failed");
    assert_eq!((summary.done, summary.failed, summary.skipped), (1, 0, 1));
    assert!(ledger.writes().iter().all(|w| w.row == 3));
    assert_eq!(ledger.cell(3, "Status"), "Done");

    // Third run has nothing left to do
    ledger.clear_writes();
    let mut third = pipeline(ledger.clone(), second.into_resolver().into_session());
    let summary = third.run().await.expect("Third run failed");
    assert_eq!(summary.processed(), 0);
    assert!(ledger.writes().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_missing_status_column_aborts_run() {
    let ledger = Arc::new(MemoryLedger::new(&["URL", "Price"], &[]));
    let mut pipeline = pipeline(ledger, ScriptedSession::new());

    let err = pipeline.run().await.unwrap_err();

    assert!(matches!(
        err,
        PipelineError::Ledger(LedgerError::MissingColumn(ref column)) if column == "Status"
    ));
}
