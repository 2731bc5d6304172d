//! Statistics API handlers.
//!
//! ```text
//! GET /api/v1/stats/overview
//! GET /api/v1/stats/species?limit=10
//! GET /api/v1/stats/locations
//! GET /api/v1/stats/baits?limit=10
//! GET /api/v1/stats/monthly
//! GET /api/v1/stats/recent?limit=5
//! ```

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::stats::{DEFAULT_RANKING_LIMIT, DEFAULT_RECENT_LIMIT, MAX_STATS_LIMIT};
use crate::domain::{
    BaitStats, LocationStats, MonthlyStats, OverviewStats, RecentActivity, SpeciesStats,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::catches::CatchResponse;
use crate::inbound::http::fishing_sessions::SessionResponse;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, ensure_in_range};

const LIMIT: FieldName = FieldName::new("limit");

/// Optional result cap.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LimitQuery {
    /// Number of rows, 1 to 100.
    pub limit: Option<usize>,
}

impl LimitQuery {
    fn resolve(&self, default: usize) -> ApiResult<usize> {
        ensure_in_range(self.limit.unwrap_or(default), 1..=MAX_STATS_LIMIT, LIMIT)
    }
}

/// Latest sessions and catches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RecentActivityResponse {
    pub sessions: Vec<SessionResponse>,
    pub catches: Vec<CatchResponse>,
}

impl From<RecentActivity> for RecentActivityResponse {
    fn from(activity: RecentActivity) -> Self {
        Self {
            sessions: activity
                .sessions
                .into_iter()
                .map(SessionResponse::from)
                .collect(),
            catches: activity.catches.into_iter().map(CatchResponse::from).collect(),
        }
    }
}

/// Headline totals.
#[utoipa::path(
    get,
    path = "/api/v1/stats/overview",
    responses(
        (status = 200, description = "Totals", body = OverviewStats),
        (status = 401, description = "Not signed in", body = ErrorSchema)
    ),
    tags = ["stats"],
    operation_id = "statsOverview"
)]
#[get("/stats/overview")]
pub async fn overview(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<OverviewStats>> {
    let owner = session.require_user_id()?;
    Ok(web::Json(state.stats.overview(&owner).await?))
}

/// Per-species breakdown, most caught first.
#[utoipa::path(
    get,
    path = "/api/v1/stats/species",
    params(LimitQuery),
    responses(
        (status = 200, description = "Species rows", body = [SpeciesStats]),
        (status = 400, description = "Limit out of range", body = ErrorSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema)
    ),
    tags = ["stats"],
    operation_id = "statsSpecies"
)]
#[get("/stats/species")]
pub async fn species(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<LimitQuery>,
) -> ApiResult<web::Json<Vec<SpeciesStats>>> {
    let owner = session.require_user_id()?;
    let limit = query.resolve(DEFAULT_RANKING_LIMIT)?;
    Ok(web::Json(state.stats.species(&owner, limit).await?))
}

/// Per-location breakdown, most visited first.
#[utoipa::path(
    get,
    path = "/api/v1/stats/locations",
    responses(
        (status = 200, description = "Location rows", body = [LocationStats]),
        (status = 401, description = "Not signed in", body = ErrorSchema)
    ),
    tags = ["stats"],
    operation_id = "statsLocations"
)]
#[get("/stats/locations")]
pub async fn locations(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<LocationStats>>> {
    let owner = session.require_user_id()?;
    Ok(web::Json(state.stats.locations(&owner).await?))
}

/// Per-bait breakdown with success rates.
#[utoipa::path(
    get,
    path = "/api/v1/stats/baits",
    params(LimitQuery),
    responses(
        (status = 200, description = "Bait rows", body = [BaitStats]),
        (status = 400, description = "Limit out of range", body = ErrorSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema)
    ),
    tags = ["stats"],
    operation_id = "statsBaits"
)]
#[get("/stats/baits")]
pub async fn baits(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<LimitQuery>,
) -> ApiResult<web::Json<Vec<BaitStats>>> {
    let owner = session.require_user_id()?;
    let limit = query.resolve(DEFAULT_RANKING_LIMIT)?;
    Ok(web::Json(state.stats.baits(&owner, limit).await?))
}

/// Sessions and catches per month over the last year.
#[utoipa::path(
    get,
    path = "/api/v1/stats/monthly",
    responses(
        (status = 200, description = "Monthly rows", body = [MonthlyStats]),
        (status = 401, description = "Not signed in", body = ErrorSchema)
    ),
    tags = ["stats"],
    operation_id = "statsMonthly"
)]
#[get("/stats/monthly")]
pub async fn monthly(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<MonthlyStats>>> {
    let owner = session.require_user_id()?;
    Ok(web::Json(state.stats.monthly(&owner).await?))
}

/// Most recent sessions and catches.
#[utoipa::path(
    get,
    path = "/api/v1/stats/recent",
    params(LimitQuery),
    responses(
        (status = 200, description = "Recent activity", body = RecentActivityResponse),
        (status = 400, description = "Limit out of range", body = ErrorSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema)
    ),
    tags = ["stats"],
    operation_id = "statsRecent"
)]
#[get("/stats/recent")]
pub async fn recent(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<LimitQuery>,
) -> ApiResult<web::Json<RecentActivityResponse>> {
    let owner = session.require_user_id()?;
    let limit = query.resolve(DEFAULT_RECENT_LIMIT)?;
    let activity = state.stats.recent(&owner, limit).await?;
    Ok(web::Json(RecentActivityResponse::from(activity)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Catch, CatchDetails, CatchDraft, UserId};
    use chrono::{TimeZone, Utc};
    use rstest::rstest;
    use uuid::Uuid;

    #[rstest]
    #[case(None, 10, Some(10))]
    #[case(Some(3), 10, Some(3))]
    #[case(Some(100), 5, Some(100))]
    #[case(Some(0), 5, None)]
    #[case(Some(101), 5, None)]
    fn limits_default_and_stay_in_range(
        #[case] limit: Option<usize>,
        #[case] default: usize,
        #[case] expected: Option<usize>,
    ) {
        assert_eq!(LimitQuery { limit }.resolve(default).ok(), expected);
    }

    #[rstest]
    fn recent_activity_keeps_catch_order() {
        let at = Utc
            .with_ymd_and_hms(2026, 5, 2, 7, 30, 0)
            .single()
            .expect("timestamp");
        let owner = UserId::random();
        let catches = ["perch", "rudd"]
            .into_iter()
            .map(|name| Catch {
                id: Uuid::new_v4(),
                owner: owner.clone(),
                details: CatchDetails::try_from(CatchDraft {
                    species: name.to_owned(),
                    ..CatchDraft::default()
                })
                .expect("valid catch"),
                created_at: at,
                updated_at: at,
            })
            .collect();

        let response = RecentActivityResponse::from(RecentActivity {
            sessions: Vec::new(),
            catches,
        });

        assert!(response.sessions.is_empty());
        let names: Vec<&str> = response
            .catches
            .iter()
            .map(|row| row.species.as_str())
            .collect();
        assert_eq!(names, ["perch", "rudd"]);
    }
}
