//! Diesel table definitions for the fishing log schema.
//!
//! These must match `backend/migrations` exactly; regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered anglers. `email` and `username` are unique.
    users (id) {
        id -> Uuid,
        #[max_length = 120]
        email -> Varchar,
        #[max_length = 80]
        username -> Varchar,
        /// Argon2id PHC string.
        password_hash -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Fishing spots. `(user_id, name)` is unique.
    locations (id) {
        id -> Uuid,
        user_id -> Uuid,
        #[max_length = 200]
        name -> Varchar,
        latitude -> Float8,
        longitude -> Float8,
        description -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Outings. `location_id` restricts deletes of the referenced location.
    fishing_sessions (id) {
        id -> Uuid,
        user_id -> Uuid,
        location_id -> Uuid,
        session_date -> Date,
        start_time -> Time,
        end_time -> Time,
        /// Derived from the start and end times; wraps past midnight.
        duration_minutes -> Int4,
        #[max_length = 100]
        weather_conditions -> Nullable<Varchar>,
        temperature_celsius -> Nullable<Float8>,
        notes -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Individual catches, optionally attached to a session.
    catches (id) {
        id -> Uuid,
        user_id -> Uuid,
        session_id -> Nullable<Uuid>,
        #[max_length = 100]
        species -> Varchar,
        weight -> Nullable<Float8>,
        length -> Nullable<Float8>,
        #[max_length = 100]
        bait -> Nullable<Varchar>,
        released -> Bool,
        #[max_length = 500]
        photo_url -> Nullable<Varchar>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(locations -> users (user_id));
diesel::joinable!(fishing_sessions -> locations (location_id));
diesel::joinable!(catches -> fishing_sessions (session_id));

diesel::allow_tables_to_appear_in_same_query!(users, locations, fishing_sessions, catches);
