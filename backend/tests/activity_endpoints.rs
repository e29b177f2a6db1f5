//! Behavioural coverage for the CRUD, media, statistics, and discovery
//! endpoints over in-memory fixture ports.

mod support;

use std::sync::Arc;

use actix_web::http::header;
use actix_web::test::{self, TestRequest};
use serde_json::{Value, json};

use backend::domain::ports::{FixtureActivityRepository, FixtureMediaStore};
use support::{create_activity_record, create_body, fixture_state, get_json, init_app, state_with};

#[actix_rt::test]
async fn create_returns_201_with_the_stored_record() {
    let app = init_app(fixture_state()).await;
    let record = create_activity_record(&app, create_body("Soup kitchen", "upcoming", 12)).await;
    assert_eq!(record["title"], "Soup kitchen");
    assert_eq!(record["status"], "upcoming");
    assert_eq!(record["category"], "community");
    assert!(record["id"].is_string());
    assert_eq!(record["createdAt"], record["updatedAt"]);
}

#[actix_rt::test]
async fn create_rejects_participants_below_the_range() {
    let app = init_app(fixture_state()).await;
    let request = TestRequest::post()
        .uri("/api/v1/activities")
        .set_json(create_body("Tiny", "upcoming", 0))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), 400);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["code"], "invalid_request");
    assert!(
        body["message"]
            .as_str()
            .expect("message")
            .contains("between 1 and 10000")
    );
    assert_eq!(body["details"]["field"], "participants");
}

#[actix_rt::test]
async fn create_rejects_participants_above_the_range() {
    let app = init_app(fixture_state()).await;
    let request = TestRequest::post()
        .uri("/api/v1/activities")
        .set_json(create_body("Huge", "upcoming", 10_001))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), 400);
    let body: Value = test::read_body_json(response).await;
    assert!(
        body["message"]
            .as_str()
            .expect("message")
            .contains("between 1 and 10000")
    );
}

#[actix_rt::test]
async fn create_rejects_unknown_categories() {
    let app = init_app(fixture_state()).await;
    let mut body = create_body("Misfiled", "upcoming", 10);
    body["category"] = json!("sports");
    let request = TestRequest::post()
        .uri("/api/v1/activities")
        .set_json(body)
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), 400);
    let body: Value = test::read_body_json(response).await;
    assert!(body["message"].as_str().expect("message").contains("category"));
}

#[actix_rt::test]
async fn create_rejects_image_urls_without_an_image_extension() {
    let app = init_app(fixture_state()).await;
    let mut body = create_body("Bad image", "upcoming", 10);
    body["images"] = json!(["https://cdn.example.test/clip.mp4"]);
    let request = TestRequest::post()
        .uri("/api/v1/activities")
        .set_json(body)
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), 400);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["details"]["field"], "images");
}

#[actix_rt::test]
async fn get_by_id_round_trips_and_rejects_malformed_ids() {
    let app = init_app(fixture_state()).await;
    let record = create_activity_record(&app, create_body("Round trip", "upcoming", 12)).await;
    let id = record["id"].as_str().expect("id");

    let (status, fetched) = get_json(&app, &format!("/api/v1/activities/{id}")).await;
    assert_eq!(status, 200);
    assert_eq!(fetched["title"], "Round trip");

    let (status, body) = get_json(&app, "/api/v1/activities/not-a-uuid").await;
    assert_eq!(status, 400);
    assert_eq!(body["message"], "invalid id format");

    let (status, body) = get_json(
        &app,
        "/api/v1/activities/00000000-0000-0000-0000-000000000099",
    )
    .await;
    assert_eq!(status, 404);
    assert_eq!(body["code"], "not_found");
}

#[actix_rt::test]
async fn update_applies_partial_changes_and_refreshes_the_stamp() {
    let app = init_app(fixture_state()).await;
    let record = create_activity_record(&app, create_body("Original", "upcoming", 12)).await;
    let id = record["id"].as_str().expect("id");

    let request = TestRequest::put()
        .uri(&format!("/api/v1/activities/{id}"))
        .set_json(json!({ "status": "ongoing", "participants": 40 }))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), 200);
    let updated: Value = test::read_body_json(response).await;
    assert_eq!(updated["status"], "ongoing");
    assert_eq!(updated["participants"], 40);
    assert_eq!(updated["title"], "Original");
    assert!(updated["updatedAt"].as_str() >= updated["createdAt"].as_str());
}

#[actix_rt::test]
async fn update_validates_supplied_fields_only() {
    let app = init_app(fixture_state()).await;
    let record = create_activity_record(&app, create_body("Guarded", "upcoming", 12)).await;
    let id = record["id"].as_str().expect("id");

    let request = TestRequest::put()
        .uri(&format!("/api/v1/activities/{id}"))
        .set_json(json!({ "participants": 10001 }))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), 400);
}

#[actix_rt::test]
async fn update_unknown_id_is_404() {
    let app = init_app(fixture_state()).await;
    let request = TestRequest::put()
        .uri("/api/v1/activities/00000000-0000-0000-0000-000000000099")
        .set_json(json!({ "status": "ongoing" }))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), 404);
}

#[actix_rt::test]
async fn delete_removes_the_record() {
    let app = init_app(fixture_state()).await;
    let record = create_activity_record(&app, create_body("Ephemeral", "upcoming", 12)).await;
    let id = record["id"].as_str().expect("id");

    let response = test::call_service(
        &app,
        TestRequest::delete()
            .uri(&format!("/api/v1/activities/{id}"))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), 204);

    let (status, _) = get_json(&app, &format!("/api/v1/activities/{id}")).await;
    assert_eq!(status, 404);
}

#[actix_rt::test]
async fn delete_succeeds_even_when_the_provider_delete_fails() {
    let state = state_with(
        Arc::new(FixtureActivityRepository::new()),
        Arc::new(FixtureMediaStore::failing_deletes()),
    );
    let app = init_app(state).await;

    let mut body = create_body("Decorated", "upcoming", 12);
    body["images"] = json!(["https://media.invalid/fixture/walk.jpg"]);
    let record = create_activity_record(&app, body).await;
    let id = record["id"].as_str().expect("id");

    let response = test::call_service(
        &app,
        TestRequest::delete()
            .uri(&format!("/api/v1/activities/{id}"))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), 204, "media failure must not block deletion");

    let (status, _) = get_json(&app, &format!("/api/v1/activities/{id}")).await;
    assert_eq!(status, 404);
}

fn multipart_payload(boundary: &str, parts: &[(&str, &str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (file_name, content_type, bytes) in parts {
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"files\"; filename=\"{file_name}\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    body
}

#[actix_rt::test]
async fn upload_returns_per_file_results() {
    let app = init_app(fixture_state()).await;
    let boundary = "----integration-boundary";
    let payload = multipart_payload(
        boundary,
        &[
            ("river.jpg", "image/jpeg", b"jpeg-bytes"),
            ("clip.mp4", "video/mp4", b"mp4-bytes"),
        ],
    );

    let request = TestRequest::post()
        .uri("/api/v1/activities/upload")
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        ))
        .set_payload(payload)
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), 200);
    let body: Value = test::read_body_json(response).await;
    let files = body["files"].as_array().expect("files array");
    assert_eq!(files.len(), 2);
    assert_eq!(files[0]["originalName"], "river.jpg");
    assert_eq!(files[0]["kind"], "image");
    assert!(files[0]["url"].as_str().expect("url").starts_with("https://"));
    assert_eq!(files[1]["kind"], "video");
}

#[actix_rt::test]
async fn upload_rejects_non_media_content_types() {
    let app = init_app(fixture_state()).await;
    let boundary = "----integration-boundary";
    let payload = multipart_payload(boundary, &[("notes.txt", "text/plain", b"hello")]);

    let request = TestRequest::post()
        .uri("/api/v1/activities/upload")
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        ))
        .set_payload(payload)
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), 400);
    let body: Value = test::read_body_json(response).await;
    assert!(
        body["message"]
            .as_str()
            .expect("message")
            .contains("image and video")
    );
}

#[actix_rt::test]
async fn upload_rejects_an_empty_batch() {
    let app = init_app(fixture_state()).await;
    let boundary = "----integration-boundary";
    let payload = multipart_payload(boundary, &[]);

    let request = TestRequest::post()
        .uri("/api/v1/activities/upload")
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        ))
        .set_payload(payload)
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), 400);
}

#[actix_rt::test]
async fn media_delete_requires_an_asset_id() {
    let app = init_app(fixture_state()).await;
    let request = TestRequest::delete()
        .uri("/api/v1/activities/upload")
        .set_json(json!({ "kind": "image" }))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), 400);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["details"]["field"], "assetId");
}

#[actix_rt::test]
async fn media_delete_succeeds_by_asset_id() {
    let app = init_app(fixture_state()).await;
    let request = TestRequest::delete()
        .uri("/api/v1/activities/upload")
        .set_json(json!({ "assetId": "fixture/walk", "kind": "image" }))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), 204);
}

#[actix_rt::test]
async fn stats_aggregate_counts_and_participants() {
    let app = init_app(fixture_state()).await;
    create_activity_record(&app, create_body("One", "completed", 10)).await;
    create_activity_record(&app, create_body("Two", "completed", 15)).await;
    create_activity_record(&app, create_body("Three", "upcoming", 20)).await;

    let (status, body) = get_json(&app, "/api/v1/activities/stats").await;
    assert_eq!(status, 200);
    assert_eq!(body["total"], 3);
    assert_eq!(body["totalParticipants"], 45);
    assert_eq!(body["byStatus"]["completed"], 2);
    assert_eq!(body["byStatus"]["upcoming"], 1);
    assert_eq!(body["byCategory"]["community"], 3);
}

#[actix_rt::test]
async fn filter_options_report_facets_ranges_and_catalogs() {
    let app = init_app(fixture_state()).await;
    create_activity_record(&app, create_body("One", "completed", 5)).await;
    create_activity_record(&app, create_body("Two", "upcoming", 80)).await;

    let (status, body) = get_json(&app, "/api/v1/activities/filters").await;
    assert_eq!(status, 200);

    let statuses = body["statuses"].as_array().expect("statuses");
    assert_eq!(statuses.len(), 2);
    assert!(statuses.iter().all(|s| s["count"] == 1));

    assert_eq!(body["participantsRange"]["min"], 5);
    assert_eq!(body["participantsRange"]["max"], 80);
    assert!(body["dateRange"]["min"].is_string());

    let sort_values: Vec<&str> = body["sortOptions"]
        .as_array()
        .expect("sort options")
        .iter()
        .filter_map(|o| o["value"].as_str())
        .collect();
    assert_eq!(
        sort_values,
        vec!["date", "title", "participants", "createdAt", "updatedAt"]
    );
    let order_values: Vec<&str> = body["sortOrders"]
        .as_array()
        .expect("sort orders")
        .iter()
        .filter_map(|o| o["value"].as_str())
        .collect();
    assert_eq!(order_values, vec!["desc", "asc"]);
}

#[actix_rt::test]
async fn filter_options_on_an_empty_collection_omit_ranges() {
    let app = init_app(fixture_state()).await;
    let (status, body) = get_json(&app, "/api/v1/activities/filters").await;
    assert_eq!(status, 200);
    assert!(body.get("dateRange").is_none() || body["dateRange"].is_null());
    assert_eq!(body["categories"].as_array().map(Vec::len), Some(0));
}
