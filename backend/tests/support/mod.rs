//! Shared fixtures for the HTTP integration suites.

use std::sync::Arc;

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{App, Error, test, web};
use serde_json::{Value, json};

use backend::Trace;
use backend::domain::ActivityService;
use backend::domain::ports::{ActivityRepository, FixtureActivityRepository, FixtureMediaStore, MediaStore};
use backend::inbound::http::state::HttpState;

/// Handler state backed by fresh in-memory fixtures.
pub fn fixture_state() -> web::Data<HttpState> {
    state_with(
        Arc::new(FixtureActivityRepository::new()),
        Arc::new(FixtureMediaStore::new()),
    )
}

/// Handler state over explicit port implementations.
pub fn state_with(
    repository: Arc<dyn ActivityRepository>,
    media: Arc<dyn MediaStore>,
) -> web::Data<HttpState> {
    web::Data::new(HttpState::new(ActivityService::new(repository, media)))
}

/// Build the full API application around the given state.
pub async fn init_app(
    state: web::Data<HttpState>,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = Error> {
    use backend::inbound::http::activities::{
        create_activity, delete_activity, get_activity, list_activities, update_activity,
    };
    use backend::inbound::http::media::{delete_media, upload_media};
    use backend::inbound::http::stats::{get_activity_stats, get_filter_options};

    test::init_service(
        App::new()
            .app_data(state)
            .wrap(Trace)
            .service(
                web::scope("/api/v1")
                    .service(list_activities)
                    .service(get_activity_stats)
                    .service(get_filter_options)
                    .service(upload_media)
                    .service(delete_media)
                    .service(create_activity)
                    .service(get_activity)
                    .service(update_activity)
                    .service(delete_activity),
            ),
    )
    .await
}

/// A valid creation payload with overridable fields.
pub fn create_body(title: &str, status: &str, participants: i32) -> Value {
    json!({
        "title": title,
        "description": "An integration-test activity record.",
        "date": "2026-09-12T09:00:00Z",
        "location": "Community centre",
        "participants": participants,
        "status": status,
        "category": "community",
        "images": [],
        "videos": [],
    })
}

/// POST a creation payload and return the created record's JSON.
pub async fn create_activity_record<S>(app: &S, body: Value) -> Value
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    let request = test::TestRequest::post()
        .uri("/api/v1/activities")
        .set_json(body)
        .to_request();
    let response = test::call_service(app, request).await;
    assert_eq!(response.status(), 201, "creation should succeed");
    test::read_body_json(response).await
}

/// GET a path and return (status, body JSON).
pub async fn get_json<S>(app: &S, path: &str) -> (u16, Value)
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    let response =
        test::call_service(app, test::TestRequest::get().uri(path).to_request()).await;
    let status = response.status().as_u16();
    (status, test::read_body_json(response).await)
}
