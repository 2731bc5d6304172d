//! Internal Diesel row structs.
//!
//! Rows never leave the persistence layer; repositories convert them into
//! validated domain entities and treat a failed conversion as a query error.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{catches, fishing_sessions, locations, users};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    #[expect(dead_code, reason = "audit column is written but not exposed")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub username: &'a str,
    pub password_hash: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = locations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct LocationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset for location updates. `treat_none_as_null` lets a cleared
/// description reach the column.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = locations)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct LocationUpdate<'a> {
    pub name: &'a str,
    pub latitude: f64,
    pub longitude: f64,
    pub description: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = fishing_sessions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct FishingSessionRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub location_id: Uuid,
    pub session_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub duration_minutes: i32,
    pub weather_conditions: Option<String>,
    pub temperature_celsius: Option<f64>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = fishing_sessions)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct FishingSessionUpdate<'a> {
    pub location_id: Uuid,
    pub session_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub duration_minutes: i32,
    pub weather_conditions: Option<&'a str>,
    pub temperature_celsius: Option<f64>,
    pub notes: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = catches)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CatchRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub session_id: Option<Uuid>,
    pub species: String,
    pub weight: Option<f64>,
    pub length: Option<f64>,
    pub bait: Option<String>,
    pub released: bool,
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = catches)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct CatchUpdate<'a> {
    pub session_id: Option<Uuid>,
    pub species: &'a str,
    pub weight: Option<f64>,
    pub length: Option<f64>,
    pub bait: Option<&'a str>,
    pub released: bool,
    pub photo_url: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}
