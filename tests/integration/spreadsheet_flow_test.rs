// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::mock_page::{serve_page, settings_for, LISTINGS};
use rentflow::application::use_cases::listing_pipeline::{select_backend, ListingPipeline};
use rentflow::config::settings::DeliveryMode;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_spreadsheet_mode_uploads_every_scraped_row() {
    let page = serve_page(LISTINGS).await;
    let sheet = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rentals/tabellenblatt1"))
        .and(header("Authorization", "Bearer token-123"))
        .and(body_partial_json(json!({
            "tabellenblatt1": { "rent": "$2,810", "link": "https://www.zillow.com/homedetails/Parkmerced-SF/" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "tabellenblatt1": { "id": 3 } })))
        .expect(1)
        .mount(&sheet)
        .await;
    Mock::given(method("POST"))
        .and(path("/rentals/tabellenblatt1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&sheet)
        .await;

    let endpoint = format!("{}/rentals/tabellenblatt1", sheet.uri());
    let settings = settings_for(
        &page,
        &[
            ("MODE", "sheety"),
            ("SHEETY_API_POST", endpoint.as_str()),
            ("SHEETY_TOKEN", "token-123"),
        ],
    );
    assert_eq!(settings.delivery.mode, DeliveryMode::Spreadsheet);

    let pipeline = ListingPipeline::from_settings(&settings).unwrap();
    let summary = pipeline.run().await.unwrap();

    let report = summary.report.unwrap();
    assert_eq!(report.backend, "spreadsheet");
    assert_eq!(report.succeeded, 3);
}

#[test]
fn test_backend_follows_delivery_mode() {
    let mut vars = std::collections::HashMap::new();
    vars.insert("MODE".to_string(), "gform".to_string());
    let settings = rentflow::config::settings::Settings::from_env(vars).unwrap();

    let backend = select_backend(&settings).unwrap();
    assert_eq!(backend.name(), "form");
}
