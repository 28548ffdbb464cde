//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use chrono::NaiveDate;

use super::AppState;
use super::types::{CurvePoint, CurveQuery, CurveResponse, ErrorResponse, ProfilesResponse};
use crate::error::EstimateError;
use crate::report::EstimationReport;
use crate::request::{EstimationRequest, Estimator};

type ApiError = (StatusCode, Json<ErrorResponse>);

/// `GET /profiles` → 200 + `ProfilesResponse` JSON
pub async fn get_profiles(State(state): State<Arc<AppState>>) -> Json<ProfilesResponse> {
    Json(ProfilesResponse {
        reference_year: state.store.reference_year(),
        default_operator: state.store.default_operator().to_string(),
        operators: state.store.operators().map(str::to_string).collect(),
    })
}

/// `GET /profiles/curve?energy=electricity&operator=Sibelga` → 200 + `CurveResponse`
pub async fn get_curve(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CurveQuery>,
) -> Json<CurveResponse> {
    let profile = state
        .store
        .resolve(query.energy, query.operator.as_deref());
    let points = NaiveDate::from_ymd_opt(profile.reference_year(), 1, 1)
        .map(|first| {
            first
                .iter_days()
                .zip(profile.daily_weights())
                .map(|(date, &weight)| CurvePoint { date, weight })
                .collect()
        })
        .unwrap_or_default();

    Json(CurveResponse {
        profile: profile.key().to_string(),
        points,
    })
}

/// Runs one estimation.
///
/// `POST /estimate` → 200 + `EstimationReport` JSON
/// invalid readings → 400, no profile weight over the period → 422
pub async fn post_estimate(
    State(state): State<Arc<AppState>>,
    Json(request): Json<EstimationRequest>,
) -> Result<Json<EstimationReport>, ApiError> {
    Estimator::new(&state.store, &state.estimation)
        .and_then(|est| est.run(&request))
        .map(Json)
        .map_err(error_response)
}

fn error_response(err: EstimateError) -> ApiError {
    let (status, kind) = match err {
        EstimateError::Validation(_) => (StatusCode::BAD_REQUEST, "validation"),
        EstimateError::ZeroCoverage { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "zero_coverage"),
        EstimateError::NonFiniteEstimate { .. } => {
            (StatusCode::UNPROCESSABLE_ENTITY, "non_finite_estimate")
        }
        EstimateError::InvalidConversionFactor(_)
        | EstimateError::InvalidReferenceYear(_)
        | EstimateError::ReferenceYearMismatch { .. } => {
            (StatusCode::INTERNAL_SERVER_ERROR, "internal")
        }
    };
    (
        status,
        Json(ErrorResponse {
            kind,
            error: err.to_string(),
        }),
    )
}
