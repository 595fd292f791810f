use diesel::QueryableByName;
use diesel::prelude::*;
use diesel::sql_types::BigInt;

use crate::models::{NewUser, User, UserInput};

#[derive(QueryableByName)]
struct LastInsertRowId {
    #[diesel(sql_type = BigInt)]
    last_insert_rowid: i64,
}

/// Inserts a new login account.
pub fn insert_user(
    conn: &mut SqliteConnection,
    new_user: UserInput,
) -> Result<User, diesel::result::Error> {
    use crate::schema::users::dsl::*;

    let insertable_user = NewUser {
        email: new_user.email,
        password_hash: new_user.password_hash,
        is_superuser: new_user.is_superuser,
    };

    diesel::insert_into(users)
        .values(&insertable_user)
        .execute(conn)?;

    let last_id = diesel::sql_query("SELECT last_insert_rowid() as last_insert_rowid")
        .get_result::<LastInsertRowId>(conn)?
        .last_insert_rowid;

    users.filter(id.eq(last_id as i32)).first::<User>(conn)
}

/// Returns all users in ascending order by id.
pub fn list_all_users(conn: &mut SqliteConnection) -> Result<Vec<User>, diesel::result::Error> {
    use crate::schema::users::dsl::*;
    users.order(id.asc()).load::<User>(conn)
}

/// Gets a single user by ID.
pub fn get_user(
    conn: &mut SqliteConnection,
    user_id: i32,
) -> Result<Option<User>, diesel::result::Error> {
    use crate::schema::users::dsl::*;
    users.filter(id.eq(user_id)).first::<User>(conn).optional()
}

/// Gets a single user by email (case-insensitive).
pub fn get_user_by_email(
    conn: &mut SqliteConnection,
    user_email: &str,
) -> Result<Option<User>, diesel::result::Error> {
    diesel::sql_query("SELECT * FROM users WHERE LOWER(email) = LOWER(?)")
        .bind::<diesel::sql_types::Text, _>(user_email)
        .get_result::<User>(conn)
        .optional()
}

/// Replaces a user's password hash.
pub fn update_password_hash(
    conn: &mut SqliteConnection,
    user_id: i32,
    new_password_hash: &str,
) -> Result<User, diesel::result::Error> {
    use crate::schema::users::dsl::*;

    diesel::update(users.filter(id.eq(user_id)))
        .set(password_hash.eq(new_password_hash))
        .execute(conn)?;

    users.filter(id.eq(user_id)).first::<User>(conn)
}

/// Grants or revokes administrator access.
pub fn set_superuser(
    conn: &mut SqliteConnection,
    user_id: i32,
    superuser: bool,
) -> Result<User, diesel::result::Error> {
    use crate::schema::users::dsl::*;

    diesel::update(users.filter(id.eq(user_id)))
        .set(is_superuser.eq(superuser))
        .execute(conn)?;

    users.filter(id.eq(user_id)).first::<User>(conn)
}

/// Deletes a user and their sessions.
///
/// Returns the number of users removed (0 if the id was unknown).
pub fn delete_user(
    conn: &mut SqliteConnection,
    user_id: i32,
) -> Result<usize, diesel::result::Error> {
    use crate::schema::{sessions, users};

    conn.transaction(|conn| {
        diesel::delete(sessions::table.filter(sessions::user_id.eq(user_id))).execute(conn)?;
        diesel::delete(users::table.filter(users::id.eq(user_id))).execute(conn)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orm::testing::setup_test_db;

    fn user_input(email: &str, superuser: bool) -> UserInput {
        UserInput {
            email: email.to_string(),
            password_hash: "hashedpassword".to_string(),
            is_superuser: superuser,
        }
    }

    #[test]
    fn test_insert_user() {
        let mut conn = setup_test_db();

        let user = insert_user(&mut conn, user_input("test@example.com", false)).unwrap();
        assert_eq!(user.email, "test@example.com");
        assert_eq!(user.password_hash, "hashedpassword");
        assert!(!user.is_superuser);
        assert!(user.id > 0);
    }

    #[test]
    fn test_duplicate_email_rejected() {
        let mut conn = setup_test_db();
        insert_user(&mut conn, user_input("dup@example.com", false)).unwrap();
        assert!(insert_user(&mut conn, user_input("dup@example.com", true)).is_err());
    }

    #[test]
    fn test_get_user_by_email_case_insensitive() {
        let mut conn = setup_test_db();
        let inserted = insert_user(&mut conn, user_input("Test.User@Example.COM", false)).unwrap();

        for email in [
            "test.user@example.com",
            "TEST.USER@EXAMPLE.COM",
            "tEsT.uSeR@eXaMpLe.CoM",
        ] {
            let found = get_user_by_email(&mut conn, email)
                .unwrap()
                .expect("user should be found");
            assert_eq!(found.id, inserted.id);
        }
        assert!(get_user_by_email(&mut conn, "nobody@example.com").unwrap().is_none());
    }

    #[test]
    fn test_update_password_and_superuser() {
        let mut conn = setup_test_db();
        let user = insert_user(&mut conn, user_input("staff@example.com", false)).unwrap();

        let updated = update_password_hash(&mut conn, user.id, "newhash").unwrap();
        assert_eq!(updated.password_hash, "newhash");

        let promoted = set_superuser(&mut conn, user.id, true).unwrap();
        assert!(promoted.is_superuser);
    }

    #[test]
    fn test_list_and_delete() {
        let mut conn = setup_test_db();
        let first = insert_user(&mut conn, user_input("a@example.com", true)).unwrap();
        insert_user(&mut conn, user_input("b@example.com", false)).unwrap();

        let all = list_all_users(&mut conn).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, first.id);

        assert_eq!(delete_user(&mut conn, first.id).unwrap(), 1);
        assert_eq!(delete_user(&mut conn, first.id).unwrap(), 0);
        assert!(get_user(&mut conn, first.id).unwrap().is_none());
    }
}
