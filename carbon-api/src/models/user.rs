use diesel::{Identifiable, Insertable, Queryable, QueryableByName, Selectable};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::schema::users;

#[derive(
    Deserialize, Queryable, Selectable, Identifiable, QueryableByName, Debug, Clone, Serialize, TS,
)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[ts(export)]
pub struct User {
    pub id: i32,
    pub email: String, // Will be unique
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub is_superuser: bool,
}

#[derive(Insertable, Deserialize)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub is_superuser: bool,
}

// For ORM inputs; the hash is computed before this is built
#[derive(Debug, Deserialize)]
pub struct UserInput {
    pub email: String,
    pub password_hash: String,
    pub is_superuser: bool,
}
