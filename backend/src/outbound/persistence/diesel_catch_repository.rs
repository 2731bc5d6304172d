//! PostgreSQL-backed [`CatchRepository`].

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::{Page, PageRequest};
use uuid::Uuid;

use crate::domain::ports::{CatchRepository, CatchRepositoryError};
use crate::domain::{Catch, CatchDetails, CatchDraft, CatchFilter, UserId};

use super::diesel_error_mapping::{
    ConstraintViolation, constraint_violation, map_diesel_error as map_basic_diesel_error,
    map_pool_error as map_basic_pool_error,
};
use super::models::{CatchRow, CatchUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::catches;

/// Diesel implementation of the catch store.
#[derive(Clone)]
pub struct DieselCatchRepository {
    pool: DbPool,
}

impl DieselCatchRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CatchRepositoryError {
    map_basic_pool_error(error, CatchRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> CatchRepositoryError {
    map_basic_diesel_error(
        error,
        CatchRepositoryError::query,
        CatchRepositoryError::connection,
    )
}

fn map_write_error(error: diesel::result::Error, catch: &Catch) -> CatchRepositoryError {
    match (constraint_violation(&error), catch.details.session_id()) {
        (Some(ConstraintViolation::ForeignKey(_)), Some(session_id)) => {
            CatchRepositoryError::missing_session(session_id)
        }
        _ => map_diesel_error(error),
    }
}

/// Escape `LIKE` wildcards so user input only ever matches literally.
fn like_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

pub(crate) fn row_to_catch(row: CatchRow) -> Result<Catch, CatchRepositoryError> {
    let details = CatchDetails::try_from(CatchDraft {
        session_id: row.session_id,
        species: row.species,
        weight: row.weight,
        length: row.length,
        bait: row.bait,
        released: row.released,
        photo_url: row.photo_url,
    })
    .map_err(|err| CatchRepositoryError::query(format!("stored catch invalid: {err}")))?;
    Ok(Catch {
        id: row.id,
        owner: UserId::from_uuid(row.user_id),
        details,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn catch_to_row(catch: &Catch) -> CatchRow {
    let details = &catch.details;
    CatchRow {
        id: catch.id,
        user_id: *catch.owner.as_uuid(),
        session_id: details.session_id(),
        species: details.species().to_owned(),
        weight: details.weight(),
        length: details.length(),
        bait: details.bait().map(str::to_owned),
        released: details.released(),
        photo_url: details.photo_url().map(str::to_owned),
        created_at: catch.created_at,
        updated_at: catch.updated_at,
    }
}

fn filtered_catches(owner: Uuid, filter: &CatchFilter) -> catches::BoxedQuery<'static, Pg> {
    let mut query = catches::table
        .filter(catches::user_id.eq(owner))
        .into_boxed();
    if let Some(session_id) = filter.session_id {
        query = query.filter(catches::session_id.eq(session_id));
    }
    if let Some(species) = filter.species.as_deref() {
        query = query.filter(catches::species.ilike(like_pattern(species)));
    }
    if let Some(released) = filter.released {
        query = query.filter(catches::released.eq(released));
    }
    query
}

fn load_rows(rows: Vec<CatchRow>) -> Result<Vec<Catch>, CatchRepositoryError> {
    rows.into_iter().map(row_to_catch).collect()
}

#[async_trait]
impl CatchRepository for DieselCatchRepository {
    async fn create(&self, catch: &Catch) -> Result<(), CatchRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(catches::table)
            .values(&catch_to_row(catch))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_write_error(err, catch))
    }

    async fn find_for_owner(
        &self,
        owner: &UserId,
        id: Uuid,
    ) -> Result<Option<Catch>, CatchRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = catches::table
            .filter(catches::id.eq(id))
            .filter(catches::user_id.eq(owner.as_uuid()))
            .select(CatchRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_catch).transpose()
    }

    async fn list_for_owner(
        &self,
        owner: &UserId,
        filter: &CatchFilter,
        page: PageRequest,
    ) -> Result<Page<Catch>, CatchRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let owner = *owner.as_uuid();
        let total: i64 = filtered_catches(owner, filter)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows: Vec<CatchRow> = filtered_catches(owner, filter)
            .order((catches::created_at.desc(), catches::id.asc()))
            .limit(i64::try_from(page.limit()).unwrap_or(i64::MAX))
            .offset(i64::try_from(page.offset()).unwrap_or(i64::MAX))
            .select(CatchRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let items = load_rows(rows)?;
        Ok(Page::new(
            items,
            u64::try_from(total).unwrap_or_default(),
            page,
        ))
    }

    async fn list_for_session(
        &self,
        owner: &UserId,
        session_id: Uuid,
    ) -> Result<Vec<Catch>, CatchRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<CatchRow> = catches::table
            .filter(catches::user_id.eq(owner.as_uuid()))
            .filter(catches::session_id.eq(session_id))
            .order((catches::created_at.asc(), catches::id.asc()))
            .select(CatchRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        load_rows(rows)
    }

    async fn list_all_for_owner(&self, owner: &UserId) -> Result<Vec<Catch>, CatchRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<CatchRow> = catches::table
            .filter(catches::user_id.eq(owner.as_uuid()))
            .select(CatchRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        load_rows(rows)
    }

    async fn update(&self, catch: &Catch) -> Result<bool, CatchRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let details = &catch.details;
        let changes = CatchUpdate {
            session_id: details.session_id(),
            species: details.species(),
            weight: details.weight(),
            length: details.length(),
            bait: details.bait(),
            released: details.released(),
            photo_url: details.photo_url(),
            updated_at: catch.updated_at,
        };
        let affected = diesel::update(
            catches::table
                .filter(catches::id.eq(catch.id))
                .filter(catches::user_id.eq(catch.owner.as_uuid())),
        )
        .set(&changes)
        .execute(&mut conn)
        .await
        .map_err(|err| map_write_error(err, catch))?;
        Ok(affected > 0)
    }

    async fn delete(&self, owner: &UserId, id: Uuid) -> Result<bool, CatchRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let affected = diesel::delete(
            catches::table
                .filter(catches::id.eq(id))
                .filter(catches::user_id.eq(owner.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(affected > 0)
    }
}
