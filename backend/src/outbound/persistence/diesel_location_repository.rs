//! PostgreSQL-backed [`LocationRepository`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{LocationDeletion, LocationRepository, LocationRepositoryError};
use crate::domain::{Location, LocationDetails, LocationDraft, UserId};

use super::diesel_error_mapping::{
    ConstraintViolation, constraint_violation, map_diesel_error as map_basic_diesel_error,
    map_pool_error as map_basic_pool_error,
};
use super::models::{LocationRow, LocationUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::{fishing_sessions, locations};

/// Diesel implementation of the location store.
#[derive(Clone)]
pub struct DieselLocationRepository {
    pool: DbPool,
}

impl DieselLocationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> LocationRepositoryError {
    map_basic_pool_error(error, LocationRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error, name: &str) -> LocationRepositoryError {
    match constraint_violation(&error) {
        Some(ConstraintViolation::Unique(_)) => LocationRepositoryError::duplicate_name(name),
        _ => map_basic_diesel_error(
            error,
            LocationRepositoryError::query,
            LocationRepositoryError::connection,
        ),
    }
}

fn map_read_error(error: diesel::result::Error) -> LocationRepositoryError {
    map_basic_diesel_error(
        error,
        LocationRepositoryError::query,
        LocationRepositoryError::connection,
    )
}

pub(crate) fn row_to_location(row: LocationRow) -> Result<Location, LocationRepositoryError> {
    let details = LocationDetails::try_from(LocationDraft {
        name: row.name,
        latitude: row.latitude,
        longitude: row.longitude,
        description: row.description,
    })
    .map_err(|err| LocationRepositoryError::query(format!("stored location invalid: {err}")))?;
    Ok(Location {
        id: row.id,
        owner: UserId::from_uuid(row.user_id),
        details,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn location_to_row(location: &Location) -> LocationRow {
    LocationRow {
        id: location.id,
        user_id: *location.owner.as_uuid(),
        name: location.details.name().to_owned(),
        latitude: location.details.latitude(),
        longitude: location.details.longitude(),
        description: location.details.description().map(str::to_owned),
        created_at: location.created_at,
        updated_at: location.updated_at,
    }
}

#[async_trait]
impl LocationRepository for DieselLocationRepository {
    async fn create(&self, location: &Location) -> Result<(), LocationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(locations::table)
            .values(&location_to_row(location))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_diesel_error(err, location.details.name()))
    }

    async fn find_for_owner(
        &self,
        owner: &UserId,
        id: Uuid,
    ) -> Result<Option<Location>, LocationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = locations::table
            .filter(locations::id.eq(id))
            .filter(locations::user_id.eq(owner.as_uuid()))
            .select(LocationRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_read_error)?;
        row.map(row_to_location).transpose()
    }

    async fn list_for_owner(&self, owner: &UserId) -> Result<Vec<Location>, LocationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<LocationRow> = locations::table
            .filter(locations::user_id.eq(owner.as_uuid()))
            .order((locations::name.asc(), locations::id.asc()))
            .select(LocationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_read_error)?;
        rows.into_iter().map(row_to_location).collect()
    }

    async fn update(&self, location: &Location) -> Result<bool, LocationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = LocationUpdate {
            name: location.details.name(),
            latitude: location.details.latitude(),
            longitude: location.details.longitude(),
            description: location.details.description(),
            updated_at: location.updated_at,
        };
        let affected = diesel::update(
            locations::table
                .filter(locations::id.eq(location.id))
                .filter(locations::user_id.eq(location.owner.as_uuid())),
        )
        .set(&changes)
        .execute(&mut conn)
        .await
        .map_err(|err| map_diesel_error(err, location.details.name()))?;
        Ok(affected > 0)
    }

    async fn delete_if_unused(
        &self,
        owner: &UserId,
        id: Uuid,
    ) -> Result<LocationDeletion, LocationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let owner = *owner.as_uuid();
        conn.transaction(|conn| {
            async move {
                let exists: Option<Uuid> = locations::table
                    .filter(locations::id.eq(id))
                    .filter(locations::user_id.eq(owner))
                    .select(locations::id)
                    .for_update()
                    .first(conn)
                    .await
                    .optional()?;
                if exists.is_none() {
                    return Ok(LocationDeletion::NotFound);
                }

                let sessions: i64 = fishing_sessions::table
                    .filter(fishing_sessions::location_id.eq(id))
                    .count()
                    .get_result(conn)
                    .await?;
                if sessions > 0 {
                    return Ok(LocationDeletion::InUse {
                        sessions: u64::try_from(sessions).unwrap_or_default(),
                    });
                }

                diesel::delete(locations::table.filter(locations::id.eq(id)))
                    .execute(conn)
                    .await?;
                Ok(LocationDeletion::Deleted)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_read_error)
    }
}
