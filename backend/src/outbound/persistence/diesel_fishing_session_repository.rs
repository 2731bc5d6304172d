//! PostgreSQL-backed [`FishingSessionRepository`].
//!
//! Listings are assembled from three owner-scoped statements on one
//! connection: the page of sessions, the names of their locations, and the
//! catch counts per session.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::dsl::count_star;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use pagination::{Page, PageRequest};
use uuid::Uuid;

use crate::domain::ports::{
    FishingSessionFilter, FishingSessionRepository, FishingSessionRepositoryError,
};
use crate::domain::{
    FishingSession, FishingSessionDetails, FishingSessionDraft, FishingSessionSummary, UserId,
};

use super::diesel_error_mapping::{
    ConstraintViolation, constraint_violation, map_diesel_error as map_basic_diesel_error,
    map_pool_error as map_basic_pool_error,
};
use super::models::{FishingSessionRow, FishingSessionUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::{catches, fishing_sessions, locations};

/// Diesel implementation of the fishing session store.
#[derive(Clone)]
pub struct DieselFishingSessionRepository {
    pool: DbPool,
}

impl DieselFishingSessionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> FishingSessionRepositoryError {
    map_basic_pool_error(error, FishingSessionRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> FishingSessionRepositoryError {
    map_basic_diesel_error(
        error,
        FishingSessionRepositoryError::query,
        FishingSessionRepositoryError::connection,
    )
}

fn map_write_error(
    error: diesel::result::Error,
    location_id: Uuid,
) -> FishingSessionRepositoryError {
    match constraint_violation(&error) {
        Some(ConstraintViolation::ForeignKey(_)) => {
            FishingSessionRepositoryError::missing_location(location_id)
        }
        _ => map_diesel_error(error),
    }
}

fn to_u64(value: i64) -> u64 {
    u64::try_from(value).unwrap_or_default()
}

pub(crate) fn row_to_session(
    row: FishingSessionRow,
) -> Result<FishingSession, FishingSessionRepositoryError> {
    let details = FishingSessionDetails::try_from(FishingSessionDraft {
        location_id: row.location_id,
        date: row.session_date,
        start_time: row.start_time,
        end_time: row.end_time,
        weather_conditions: row.weather_conditions,
        temperature_celsius: row.temperature_celsius,
        notes: row.notes,
    })
    .map_err(|err| {
        FishingSessionRepositoryError::query(format!("stored fishing session invalid: {err}"))
    })?;
    Ok(FishingSession {
        id: row.id,
        owner: UserId::from_uuid(row.user_id),
        details,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn session_to_row(session: &FishingSession) -> FishingSessionRow {
    let details = &session.details;
    FishingSessionRow {
        id: session.id,
        user_id: *session.owner.as_uuid(),
        location_id: details.location_id(),
        session_date: details.date(),
        start_time: details.start_time(),
        end_time: details.end_time(),
        duration_minutes: details.duration_minutes(),
        weather_conditions: details.weather_conditions().map(str::to_owned),
        temperature_celsius: details.temperature_celsius(),
        notes: details.notes().map(str::to_owned),
        created_at: session.created_at,
        updated_at: session.updated_at,
    }
}

fn owned_sessions(
    owner: Uuid,
    filter: FishingSessionFilter,
) -> fishing_sessions::BoxedQuery<'static, Pg> {
    let mut query = fishing_sessions::table
        .filter(fishing_sessions::user_id.eq(owner))
        .into_boxed();
    if let Some(location_id) = filter.location_id {
        query = query.filter(fishing_sessions::location_id.eq(location_id));
    }
    query
}

async fn location_names(
    conn: &mut AsyncPgConnection,
    ids: &[Uuid],
) -> Result<HashMap<Uuid, String>, diesel::result::Error> {
    let rows: Vec<(Uuid, String)> = locations::table
        .filter(locations::id.eq_any(ids))
        .select((locations::id, locations::name))
        .load(conn)
        .await?;
    Ok(rows.into_iter().collect())
}

async fn catch_counts(
    conn: &mut AsyncPgConnection,
    ids: &[Uuid],
) -> Result<HashMap<Uuid, u64>, diesel::result::Error> {
    let rows: Vec<(Option<Uuid>, i64)> = catches::table
        .filter(catches::session_id.eq_any(ids))
        .group_by(catches::session_id)
        .select((catches::session_id, count_star()))
        .load(conn)
        .await?;
    Ok(rows
        .into_iter()
        .filter_map(|(id, count)| id.map(|id| (id, to_u64(count))))
        .collect())
}

#[async_trait]
impl FishingSessionRepository for DieselFishingSessionRepository {
    async fn create(&self, session: &FishingSession) -> Result<(), FishingSessionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(fishing_sessions::table)
            .values(&session_to_row(session))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_write_error(err, session.details.location_id()))
    }

    async fn find_for_owner(
        &self,
        owner: &UserId,
        id: Uuid,
    ) -> Result<Option<FishingSession>, FishingSessionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = fishing_sessions::table
            .filter(fishing_sessions::id.eq(id))
            .filter(fishing_sessions::user_id.eq(owner.as_uuid()))
            .select(FishingSessionRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_session).transpose()
    }

    async fn list_for_owner(
        &self,
        owner: &UserId,
        filter: FishingSessionFilter,
        page: PageRequest,
    ) -> Result<Page<FishingSessionSummary>, FishingSessionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let owner = *owner.as_uuid();
        let limit = i64::try_from(page.limit()).unwrap_or(i64::MAX);
        let offset = i64::try_from(page.offset()).unwrap_or(i64::MAX);

        let total: i64 = owned_sessions(owner, filter)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows: Vec<FishingSessionRow> = owned_sessions(owner, filter)
            .order((
                fishing_sessions::session_date.desc(),
                fishing_sessions::start_time.desc(),
                fishing_sessions::id.asc(),
            ))
            .limit(limit)
            .offset(offset)
            .select(FishingSessionRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let session_ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let location_ids: Vec<Uuid> = rows.iter().map(|row| row.location_id).collect();
        let names = location_names(&mut conn, &location_ids)
            .await
            .map_err(map_diesel_error)?;
        let counts = catch_counts(&mut conn, &session_ids)
            .await
            .map_err(map_diesel_error)?;

        let items = rows
            .into_iter()
            .map(|row| {
                let location_name = names.get(&row.location_id).cloned().unwrap_or_default();
                let catches_count = counts.get(&row.id).copied().unwrap_or_default();
                row_to_session(row).map(|session| FishingSessionSummary {
                    session,
                    location_name,
                    catches_count,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(items, to_u64(total), page))
    }

    async fn list_all_for_owner(
        &self,
        owner: &UserId,
    ) -> Result<Vec<FishingSession>, FishingSessionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<FishingSessionRow> = fishing_sessions::table
            .filter(fishing_sessions::user_id.eq(owner.as_uuid()))
            .select(FishingSessionRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_session).collect()
    }

    async fn update(&self, session: &FishingSession) -> Result<bool, FishingSessionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let details = &session.details;
        let changes = FishingSessionUpdate {
            location_id: details.location_id(),
            session_date: details.date(),
            start_time: details.start_time(),
            end_time: details.end_time(),
            duration_minutes: details.duration_minutes(),
            weather_conditions: details.weather_conditions(),
            temperature_celsius: details.temperature_celsius(),
            notes: details.notes(),
            updated_at: session.updated_at,
        };
        let affected = diesel::update(
            fishing_sessions::table
                .filter(fishing_sessions::id.eq(session.id))
                .filter(fishing_sessions::user_id.eq(session.owner.as_uuid())),
        )
        .set(&changes)
        .execute(&mut conn)
        .await
        .map_err(|err| map_write_error(err, details.location_id()))?;
        Ok(affected > 0)
    }

    async fn delete_with_catches(
        &self,
        owner: &UserId,
        id: Uuid,
    ) -> Result<Option<u64>, FishingSessionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let owner = *owner.as_uuid();
        conn.transaction(|conn| {
            async move {
                let exists: Option<Uuid> = fishing_sessions::table
                    .filter(fishing_sessions::id.eq(id))
                    .filter(fishing_sessions::user_id.eq(owner))
                    .select(fishing_sessions::id)
                    .for_update()
                    .first(conn)
                    .await
                    .optional()?;
                if exists.is_none() {
                    return Ok(None);
                }

                let removed = diesel::delete(catches::table.filter(catches::session_id.eq(id)))
                    .execute(conn)
                    .await?;
                diesel::delete(fishing_sessions::table.filter(fishing_sessions::id.eq(id)))
                    .execute(conn)
                    .await?;
                Ok(Some(u64::try_from(removed).unwrap_or_default()))
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }
}
