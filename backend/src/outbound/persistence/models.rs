//! Internal Diesel row structs.
//!
//! These never leave the persistence layer; the store adapter converts them
//! into domain types.

use diesel::prelude::*;

use super::schema::{artist_profiles, users};

/// Row read back from `users`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
    pub display_name: String,
    pub email: String,
    pub is_artist: bool,
}

/// Insertable user; `id` and `created_at` come from column defaults.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub display_name: &'a str,
    pub email: &'a str,
    pub is_artist: bool,
}

#[derive(Debug, Clone, Copy, Queryable, Selectable)]
#[diesel(table_name = artist_profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ArtistProfileRow {
    pub user_id: i64,
    pub genre_id: Option<i32>,
}

#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = artist_profiles)]
pub(crate) struct NewArtistProfileRow {
    pub user_id: i64,
    pub genre_id: Option<i32>,
}
