//! Diesel table definitions for the PostgreSQL schema.
//!
//! Must match `backend/migrations`; regenerate with `diesel print-schema`
//! after schema changes.

diesel::table! {
    /// Registered accounts. `id` doubles as the identity provider uid.
    users (id) {
        id -> Int8,
        display_name -> Varchar,
        /// Unique via `users_email_key`.
        email -> Varchar,
        is_artist -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Artist profiles, at most one per user.
    artist_profiles (user_id) {
        user_id -> Int8,
        /// Catalogue genre; not validated on write.
        genre_id -> Nullable<Int4>,
    }
}

diesel::joinable!(artist_profiles -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(artist_profiles, users);
