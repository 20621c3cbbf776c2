// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::mock_backend::{RecordingBackend, RecordingNotifier};
use super::helpers::mock_page::{serve_page, settings_for, LISTINGS};
use rentflow::application::use_cases::listing_pipeline::{ListingPipeline, PipelineError};
use rentflow::config::settings::Settings;
use rentflow::domain::models::delivery::SubmissionOutcome;
use std::collections::HashMap;
use std::sync::Arc;

fn pipeline(
    settings: &Settings,
    backend: &Arc<RecordingBackend>,
    notifier: &Arc<RecordingNotifier>,
) -> ListingPipeline {
    ListingPipeline::new(&settings.source, backend.clone(), notifier.clone()).unwrap()
}

#[tokio::test]
async fn test_pipeline_delivers_records_in_scrape_order() {
    let server = serve_page(LISTINGS).await;
    let settings = settings_for(&server, &[]);
    let backend = Arc::new(RecordingBackend::default());
    let notifier = Arc::new(RecordingNotifier::default());

    let summary = pipeline(&settings, &backend, &notifier).run().await.unwrap();

    assert_eq!(summary.listings, 3);
    assert_eq!(summary.records, 3);
    let report = summary.report.unwrap();
    assert_eq!(report.succeeded, 3);

    let received = backend.received();
    let addresses: Vec<_> = received.iter().map(|r| r.address.as_str()).collect();
    assert_eq!(
        addresses,
        vec![
            "747 Geary Street, 747 Geary St, Oakland, CA 94609",
            "Parkmerced 3711 19th Ave, San Francisco, CA",
            "The Avery 488 Folsom St, San Francisco, CA",
        ]
    );
    assert_eq!(received[0].rent, "$2,895");
    assert_eq!(received[2].link, "/b/the-avery-san-francisco-ca/");
    assert_eq!(notifier.calls(), 1);
}

#[tokio::test]
async fn test_misaligned_sequences_are_truncated() {
    // The third card has no price, so only two complete entries remain.
    let html = LISTINGS.replace("$3,950+ 1 bd", "Contact for price");
    let server = serve_page(&html).await;
    let settings = settings_for(&server, &[]);
    let backend = Arc::new(RecordingBackend::default());
    let notifier = Arc::new(RecordingNotifier::default());

    let summary = pipeline(&settings, &backend, &notifier).run().await.unwrap();

    assert_eq!(summary.listings, 3);
    assert_eq!(summary.records, 2);
    let received = backend.received();
    assert_eq!(received[1].rent, "$2,810");
    assert_eq!(received[1].link, "https://www.zillow.com/homedetails/Parkmerced-SF/");
}

#[tokio::test]
async fn test_page_without_cards_aborts_run() {
    let server = serve_page("<html><body><p>Nothing to rent</p></body></html>").await;
    let settings = settings_for(&server, &[]);
    let backend = Arc::new(RecordingBackend::default());
    let notifier = Arc::new(RecordingNotifier::default());

    let err = pipeline(&settings, &backend, &notifier).run().await.unwrap_err();

    assert!(matches!(err, PipelineError::NoListings));
    assert!(backend.received().is_empty());
    assert_eq!(notifier.calls(), 0);
}

#[tokio::test]
async fn test_unreachable_page_aborts_run() {
    let mut vars = HashMap::new();
    vars.insert("RENTFLOW__SOURCE__URL".to_string(), "http://127.0.0.1:9/".to_string());
    let settings = Settings::from_env(vars).unwrap();
    let backend = Arc::new(RecordingBackend::default());
    let notifier = Arc::new(RecordingNotifier::default());

    let err = pipeline(&settings, &backend, &notifier).run().await.unwrap_err();

    assert!(matches!(err, PipelineError::PageUnavailable(_)));
    assert_eq!(notifier.calls(), 0);
}

#[tokio::test]
async fn test_cards_without_records_skip_delivery() {
    let html = r#"<html><body>
        <div class="StyledPropertyCardDataWrapper"><address>1 Lone St</address></div>
    </body></html>"#;
    let server = serve_page(html).await;
    let settings = settings_for(&server, &[]);
    let backend = Arc::new(RecordingBackend::default());
    let notifier = Arc::new(RecordingNotifier::default());

    let summary = pipeline(&settings, &backend, &notifier).run().await.unwrap();

    assert_eq!(summary.listings, 1);
    assert_eq!(summary.records, 0);
    assert!(summary.report.is_none());
    assert_eq!(notifier.calls(), 0);
}

#[tokio::test]
async fn test_partial_failures_still_notify_once() {
    let server = serve_page(LISTINGS).await;
    let settings = settings_for(&server, &[]);
    let backend = Arc::new(RecordingBackend::with_outcomes(vec![
        SubmissionOutcome::Success,
        SubmissionOutcome::Timeout,
        SubmissionOutcome::OtherFailure,
    ]));
    let notifier = Arc::new(RecordingNotifier::default());

    let summary = pipeline(&settings, &backend, &notifier).run().await.unwrap();

    let report = summary.report.unwrap();
    assert_eq!(report.attempted, 3);
    assert_eq!(report.succeeded, 1);
    assert_eq!(report.timed_out, 1);
    assert_eq!(report.failed, 1);

    assert_eq!(notifier.calls(), 1);
    assert_eq!(notifier.reports()[0], report);
}

#[tokio::test]
async fn test_fatal_delivery_error_skips_notification() {
    let server = serve_page(LISTINGS).await;
    let settings = settings_for(&server, &[]);
    let backend = Arc::new(RecordingBackend::failing());
    let notifier = Arc::new(RecordingNotifier::default());

    let err = pipeline(&settings, &backend, &notifier).run().await.unwrap_err();

    assert!(matches!(err, PipelineError::Delivery(_)));
    assert_eq!(notifier.calls(), 0);
}

#[tokio::test]
async fn test_extraction_is_repeatable_on_unchanged_page() {
    let server = serve_page(LISTINGS).await;
    let settings = settings_for(&server, &[]);
    let backend = Arc::new(RecordingBackend::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let pipeline = pipeline(&settings, &backend, &notifier);

    let (_, first) = pipeline.collect_records().await.unwrap();
    let (_, second) = pipeline.collect_records().await.unwrap();

    let strip = |records: Vec<rentflow::domain::models::record::Record>| {
        records
            .into_iter()
            .map(|r| (r.address, r.rent, r.link))
            .collect::<Vec<_>>()
    };
    assert_eq!(strip(first), strip(second));
}

#[test]
fn test_spreadsheet_mode_without_endpoint_fails_before_network() {
    let mut vars = HashMap::new();
    vars.insert("MODE".to_string(), "sheety".to_string());
    let settings = Settings::from_env(vars).unwrap();

    match ListingPipeline::from_settings(&settings) {
        Err(PipelineError::Configuration(_)) => {}
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("pipeline should not be built"),
    }
}
