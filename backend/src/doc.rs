//! OpenAPI document assembled from the HTTP adapter's annotations.

use utoipa::OpenApi;

/// Public OpenAPI surface used by Swagger UI and tooling.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Volunteer Activity API",
        description = "CRUD, listing, statistics, and media attachment for volunteer activity records."
    ),
    paths(
        crate::inbound::http::activities::list_activities,
        crate::inbound::http::activities::get_activity,
        crate::inbound::http::activities::create_activity,
        crate::inbound::http::activities::update_activity,
        crate::inbound::http::activities::delete_activity,
        crate::inbound::http::stats::get_activity_stats,
        crate::inbound::http::stats::get_filter_options,
        crate::inbound::http::media::upload_media,
        crate::inbound::http::media::delete_media,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        crate::inbound::http::schemas::ErrorSchema,
        crate::inbound::http::schemas::ErrorCodeSchema,
        crate::inbound::http::activities_dto::ActivityBody,
        crate::inbound::http::activities_dto::ActivityListResponse,
        crate::inbound::http::activities_dto::AppliedFiltersBody,
        crate::inbound::http::activities_dto::ListingMetadataBody,
        crate::inbound::http::activities_dto::CreateActivityRequestBody,
        crate::inbound::http::activities_dto::UpdateActivityRequestBody,
        crate::inbound::http::media::MediaUploadResponse,
        crate::inbound::http::media::MediaUploadResultBody,
        crate::inbound::http::media::DeleteMediaRequestBody,
        crate::inbound::http::stats::ActivityStatsResponse,
        crate::inbound::http::stats::FilterOptionsResponse,
        crate::inbound::http::stats::FacetBody,
        crate::inbound::http::stats::LabelledOptionBody,
        crate::inbound::http::stats::DateRangeBody,
        crate::inbound::http::stats::ParticipantsRangeBody,
    )),
    tags(
        (name = "activities", description = "Activity records and aggregates"),
        (name = "media", description = "Media hosting operations"),
        (name = "health", description = "Probes for orchestration")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use utoipa::OpenApi;

    use super::ApiDoc;

    #[rstest]
    fn document_lists_every_endpoint() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();
        for expected in [
            "/api/v1/activities",
            "/api/v1/activities/{id}",
            "/api/v1/activities/stats",
            "/api/v1/activities/filters",
            "/api/v1/activities/upload",
            "/health/ready",
            "/health/live",
        ] {
            assert!(paths.contains(&expected), "missing path {expected}");
        }
    }
}
