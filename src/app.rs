//! Incentive map web application

use crate::aggregation::{self, Filters};
use crate::app_state::SharedAppState;
use crate::error::IncentiveMapError;
use crate::metrics::{metrics_handler, record_response_metrics, request_counter};
use crate::models;
use crate::render;
use crate::types::Region;
use crate::validated_json::ValidatedJson;

use axum::{
    extract::{RawQuery, State},
    http::header,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

use tower::Layer;
use tower::ServiceBuilder;
use tower_http::normalize_path::NormalizePath;
use tower_http::normalize_path::NormalizePathLayer;
use tower_http::trace::TraceLayer;

/// `axum::Router` wrapped in a trailing slash normaliser.
pub type Service = NormalizePath<Router>;

/// Build the application router.
///
/// # Arguments
///
/// * `state`: Shared application state
fn router(state: SharedAppState) -> Router {
    fn v1() -> Router<SharedAppState> {
        Router::new()
            .route("/options", get(options))
            .route("/aggregate", post(aggregate))
    }

    Router::new()
        .route("/", get(index))
        .route("/map.svg", get(map_svg))
        .route("/healthz", get(healthz))
        .route("/metrics", get(metrics_handler))
        .nest("/api/v1", v1())
        .layer(
            ServiceBuilder::new().layer(
                TraceLayer::new_for_http()
                    .on_request(request_counter)
                    .on_response(record_response_metrics),
            ),
        )
        .with_state(state)
}

/// Returns an [crate::app::Service] serving the incentive map.
///
/// # Arguments
///
/// * `state`: Shared application state
pub fn service(state: SharedAppState) -> Service {
    let router = router(state);

    // Trim trailing slashes from requests.
    NormalizePathLayer::trim_trailing_slash().layer(router)
}

async fn healthz() -> &'static str {
    "ok"
}

/// Dashboard page.
async fn index(
    State(state): State<SharedAppState>,
    RawQuery(query): RawQuery,
) -> Result<Html<String>, IncentiveMapError> {
    let request = models::FilterRequest::from_query(query.as_deref())?;
    let dataset = &state.dataset;
    let filters = Filters::resolve(&request, dataset);
    let aggregation = aggregation::aggregate(dataset, &filters);
    render::render_page(dataset, &request, &filters, &aggregation).map(Html)
}

/// The choropleth as a standalone SVG.
async fn map_svg(
    State(state): State<SharedAppState>,
    RawQuery(query): RawQuery,
) -> Result<Response, IncentiveMapError> {
    let request = models::FilterRequest::from_query(query.as_deref())?;
    let dataset = &state.dataset;
    let filters = Filters::resolve(&request, dataset);
    let aggregation = aggregation::aggregate(dataset, &filters);
    let svg = render::render_map(dataset, &aggregation, &filters)?;
    Ok(([(header::CONTENT_TYPE, mime::IMAGE_SVG.as_ref())], svg).into_response())
}

/// Available filter values.
async fn options(State(state): State<SharedAppState>) -> Json<models::OptionsResponse> {
    Json(models::OptionsResponse {
        devices: state.dataset.device_names().to_vec(),
        regions: Region::ALL.to_vec(),
    })
}

/// Aggregate program counts under the requested filters.
async fn aggregate(
    State(state): State<SharedAppState>,
    ValidatedJson(request): ValidatedJson<models::FilterRequest>,
) -> Json<models::AggregateResponse> {
    let dataset = &state.dataset;
    let filters = Filters::resolve(&request, dataset);
    let aggregation = aggregation::aggregate(dataset, &filters);
    Json(models::AggregateResponse {
        load_error: dataset.load_error().map(str::to_string),
        counts: aggregation.counts(),
        aggregation,
    })
}
