//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use state_builders::build_http_state;

use actix_cors::Cors;
use actix_web::body::MessageBody;
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header;
use actix_web::{App, HttpResponse, HttpServer, ResponseError, middleware::Compress, web};

use backend::Trace;
use backend::domain::Error;
#[cfg(debug_assertions)]
use backend::doc::ApiDoc;
use backend::inbound::http::activities::{
    create_activity, delete_activity, get_activity, list_activities, update_activity,
};
use backend::inbound::http::health::{HealthState, live, ready};
use backend::inbound::http::media::{delete_media, upload_media};
use backend::inbound::http::state::HttpState;
use backend::inbound::http::stats::{get_activity_stats, get_filter_options};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

/// JSON 404 for unknown routes.
async fn not_found() -> HttpResponse {
    Error::not_found("route not found").error_response()
}

#[cfg(feature = "metrics")]
fn make_metrics() -> actix_web_prom::PrometheusMetrics {
    actix_web_prom::PrometheusMetricsBuilder::new("backend")
        .endpoint("/metrics")
        .build()
        .expect("configure Prometheus metrics")
}

fn build_cors(origin: &str) -> Cors {
    let cors = Cors::default()
        .allowed_methods(["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .supports_credentials()
        .max_age(3600);
    if origin == "*" {
        cors.allow_any_origin()
    } else {
        cors.allowed_origin(origin)
    }
}

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    cors_origin: String,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    // Fixed-segment routes register before `{id}` so `/activities/stats`,
    // `/activities/filters`, and `/activities/upload` never bind as ids.
    let api = web::scope("/api/v1")
        .service(list_activities)
        .service(get_activity_stats)
        .service(get_filter_options)
        .service(upload_media)
        .service(delete_media)
        .service(create_activity)
        .service(get_activity)
        .service(update_activity)
        .service(delete_activity);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .wrap(Compress::default())
        .wrap(build_cors(cors_origin.as_str()))
        .service(api)
        .service(ready)
        .service(live)
        .default_service(web::route().to(not_found));

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()));

    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server using the provided health state and
/// configuration.
///
/// # Errors
///
/// Propagates [`std::io::Error`] when state construction or binding the
/// socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = web::Data::new(build_http_state(&config)?);
    let ServerConfig {
        bind_addr,
        cors_origin,
        ..
    } = config;

    #[cfg(feature = "metrics")]
    let metrics = make_metrics();

    let server = HttpServer::new(move || {
        let app = build_app(
            server_health_state.clone(),
            http_state.clone(),
            cors_origin.clone(),
        );

        #[cfg(feature = "metrics")]
        let app = app.wrap(metrics.clone());

        app
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
