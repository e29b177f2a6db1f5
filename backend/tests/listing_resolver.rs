//! Behavioural coverage for the listing endpoint: filtering, sorting,
//! pagination arithmetic, and parameter validation at the boundary.

#[expect(dead_code, reason = "shared helpers include functions used by other suites")]
mod support;

use serde_json::{Value, json};

use support::{create_activity_record, create_body, fixture_state, get_json, init_app};

async fn seed_completed_and_upcoming(
    app: &(impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse<actix_web::body::BoxBody>,
        Error = actix_web::Error,
    >),
    completed: usize,
    upcoming: usize,
) {
    for i in 0..completed {
        create_activity_record(app, create_body(&format!("Completed {i:02}"), "completed", 10))
            .await;
    }
    for i in 0..upcoming {
        create_activity_record(app, create_body(&format!("Upcoming {i:02}"), "upcoming", 10))
            .await;
    }
}

#[actix_rt::test]
async fn status_filter_scenario_from_the_listing_contract() {
    let app = init_app(fixture_state()).await;
    seed_completed_and_upcoming(&app, 10, 15).await;

    let (status, body) =
        get_json(&app, "/api/v1/activities?status=completed&page=1&limit=10").await;
    assert_eq!(status, 200);

    let activities = body["activities"].as_array().expect("activities array");
    assert!(activities.len() <= 10);
    assert!(activities.iter().all(|a| a["status"] == "completed"));
    assert_eq!(body["pagination"]["totalItems"], 10);
    assert_eq!(body["pagination"]["totalPages"], 1);
    assert_eq!(body["pagination"]["hasNextPage"], false);
    assert_eq!(body["filters"]["status"], "completed");
    assert!(body["metadata"]["queryTime"].is_string());
    assert_eq!(body["metadata"]["totalActivities"], 10);
}

#[actix_rt::test]
async fn page_beyond_the_end_returns_an_empty_window() {
    let app = init_app(fixture_state()).await;
    seed_completed_and_upcoming(&app, 0, 3).await;

    let (status, body) = get_json(&app, "/api/v1/activities?page=999&limit=10").await;
    assert_eq!(status, 200);
    assert_eq!(body["activities"].as_array().map(Vec::len), Some(0));
    assert_eq!(body["pagination"]["hasNextPage"], false);
    assert_eq!(body["pagination"]["totalItems"], 3);
    // The literal window arithmetic is preserved, not clamped.
    assert_eq!(body["pagination"]["startIndex"], 9981);
    assert_eq!(body["pagination"]["endIndex"], 3);
}

#[actix_rt::test]
async fn window_size_is_the_remainder_on_the_last_page() {
    let app = init_app(fixture_state()).await;
    seed_completed_and_upcoming(&app, 0, 25).await;

    let (_, body) = get_json(&app, "/api/v1/activities?page=3&limit=10").await;
    assert_eq!(body["activities"].as_array().map(Vec::len), Some(5));
    assert_eq!(body["pagination"]["totalPages"], 3);
    assert_eq!(body["pagination"]["startIndex"], 21);
    assert_eq!(body["pagination"]["endIndex"], 25);
    assert_eq!(body["pagination"]["hasPrevPage"], true);
    assert_eq!(body["pagination"]["hasNextPage"], false);
}

#[actix_rt::test]
async fn empty_collection_yields_zeroed_metadata() {
    let app = init_app(fixture_state()).await;
    let (_, body) = get_json(&app, "/api/v1/activities").await;
    assert_eq!(body["pagination"]["totalPages"], 0);
    assert_eq!(body["pagination"]["hasNextPage"], false);
    assert_eq!(body["pagination"]["hasPrevPage"], false);
    assert_eq!(body["pagination"]["endIndex"], 0);
}

#[actix_rt::test]
async fn keyword_wins_over_search_and_is_echoed() {
    let app = init_app(fixture_state()).await;
    create_activity_record(&app, create_body("River clean-up", "upcoming", 10)).await;
    create_activity_record(&app, create_body("Beach patrol", "upcoming", 10)).await;

    let (_, body) = get_json(&app, "/api/v1/activities?keyword=river&search=beach").await;
    let activities = body["activities"].as_array().expect("activities array");
    assert_eq!(activities.len(), 1);
    assert_eq!(activities[0]["title"], "River clean-up");
    assert_eq!(body["filters"]["keyword"], "river");
}

#[actix_rt::test]
async fn search_alias_still_filters_when_keyword_is_absent() {
    let app = init_app(fixture_state()).await;
    create_activity_record(&app, create_body("River clean-up", "upcoming", 10)).await;
    create_activity_record(&app, create_body("Beach patrol", "upcoming", 10)).await;

    let (_, body) = get_json(&app, "/api/v1/activities?search=beach").await;
    let activities = body["activities"].as_array().expect("activities array");
    assert_eq!(activities.len(), 1);
    assert_eq!(body["filters"]["keyword"], "beach");
}

#[actix_rt::test]
async fn keyword_matches_description_and_location_too() {
    let app = init_app(fixture_state()).await;
    let mut body = create_body("Quiet title", "upcoming", 10);
    body["location"] = json!("Riverside pavilion");
    create_activity_record(&app, body).await;

    let (_, listing) = get_json(&app, "/api/v1/activities?keyword=RIVERSIDE").await;
    assert_eq!(listing["activities"].as_array().map(Vec::len), Some(1));
}

#[actix_rt::test]
async fn sorting_by_participants_ascending() {
    let app = init_app(fixture_state()).await;
    create_activity_record(&app, create_body("Bigger", "upcoming", 50)).await;
    create_activity_record(&app, create_body("Smaller", "upcoming", 5)).await;

    let (_, body) =
        get_json(&app, "/api/v1/activities?sortBy=participants&sortOrder=asc").await;
    let participants: Vec<i64> = body["activities"]
        .as_array()
        .expect("activities array")
        .iter()
        .filter_map(|a| a["participants"].as_i64())
        .collect();
    assert_eq!(participants, vec![5, 50]);
    assert_eq!(body["filters"]["sortBy"], "participants");
    assert_eq!(body["filters"]["sortOrder"], "asc");
}

#[actix_rt::test]
async fn participants_range_filters_inclusively() {
    let app = init_app(fixture_state()).await;
    create_activity_record(&app, create_body("Ten", "upcoming", 10)).await;
    create_activity_record(&app, create_body("Fifty", "upcoming", 50)).await;
    create_activity_record(&app, create_body("Ninety", "upcoming", 90)).await;

    let (_, body) =
        get_json(&app, "/api/v1/activities?participantsMin=10&participantsMax=50").await;
    assert_eq!(body["activities"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["pagination"]["totalItems"], 2);
}

#[actix_rt::test]
async fn single_sided_date_bound_applies_an_open_end() {
    let app = init_app(fixture_state()).await;
    let mut early = create_body("Early", "upcoming", 10);
    early["date"] = json!("2026-01-15T09:00:00Z");
    create_activity_record(&app, early).await;
    let mut late = create_body("Late", "upcoming", 10);
    late["date"] = json!("2026-11-15T09:00:00Z");
    create_activity_record(&app, late).await;

    let (_, body) = get_json(&app, "/api/v1/activities?dateFrom=2026-06-01").await;
    let activities = body["activities"].as_array().expect("activities array");
    assert_eq!(activities.len(), 1);
    assert_eq!(activities[0]["title"], "Late");
}

#[actix_rt::test]
async fn inverted_date_range_is_rejected_at_the_boundary() {
    let app = init_app(fixture_state()).await;
    let (status, body) = get_json(
        &app,
        "/api/v1/activities?dateFrom=2026-06-10&dateTo=2026-06-01",
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["code"], "invalid_request");
    assert!(body["message"].as_str().expect("message").contains("dateTo"));
}

#[actix_rt::test]
async fn limit_above_the_window_bound_is_rejected() {
    let app = init_app(fixture_state()).await;
    let (status, body) = get_json(&app, "/api/v1/activities?limit=101").await;
    assert_eq!(status, 400);
    assert_eq!(body["details"]["field"], "limit");
}

#[actix_rt::test]
async fn unknown_sort_field_is_rejected_with_the_catalog() {
    let app = init_app(fixture_state()).await;
    let (status, body) = get_json(&app, "/api/v1/activities?sortBy=priority").await;
    assert_eq!(status, 400);
    assert!(body["message"].as_str().expect("message").contains("sortBy"));
}

#[actix_rt::test]
async fn listing_projection_contains_the_contract_fields() {
    let app = init_app(fixture_state()).await;
    create_activity_record(&app, create_body("Projection", "upcoming", 10)).await;

    let (_, body) = get_json(&app, "/api/v1/activities").await;
    let record = &body["activities"][0];
    for field in [
        "id", "title", "description", "date", "location", "participants", "status",
        "category", "images", "videos", "createdAt", "updatedAt",
    ] {
        assert!(!record[field].is_null(), "missing projection field {field}");
    }
}

#[actix_rt::test]
async fn responses_carry_a_trace_id_header() {
    let app = init_app(fixture_state()).await;
    let response = actix_web::test::call_service(
        &app,
        actix_web::test::TestRequest::get().uri("/api/v1/activities").to_request(),
    )
    .await;
    assert!(response.headers().contains_key("Trace-Id"));
}

fn assert_is_object(value: &Value) {
    assert!(value.is_object());
}

#[actix_rt::test]
async fn filters_echo_reports_every_effective_parameter() {
    let app = init_app(fixture_state()).await;
    let (_, body) = get_json(
        &app,
        "/api/v1/activities?status=upcoming&category=community&keyword=x&participantsMin=1",
    )
    .await;
    assert_is_object(&body["filters"]);
    assert_eq!(body["filters"]["status"], "upcoming");
    assert_eq!(body["filters"]["category"], "community");
    assert_eq!(body["filters"]["keyword"], "x");
    assert_eq!(body["filters"]["participantsMin"], 1);
    assert_eq!(body["filters"]["sortBy"], "date");
    assert_eq!(body["filters"]["sortOrder"], "desc");
}
