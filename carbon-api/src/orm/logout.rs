//! Session revocation.

use diesel::prelude::*;

use crate::orm::login::DbRunner;
use crate::schema::sessions::dsl::*;

/// Marks a session as revoked. The row is kept so the token can never be
/// reused. Unknown tokens affect zero rows.
///
/// # Returns
/// * `Ok(usize)` - Number of rows affected (1 if the session existed)
/// * `Err(diesel::result::Error)` - Database operation failed
pub async fn revoke_session<D: DbRunner>(
    db: &D,
    session_id: &str,
) -> Result<usize, diesel::result::Error> {
    let session_id = session_id.to_string();
    db.run(move |conn| {
        diesel::update(sessions.filter(id.eq(&session_id)))
            .set(revoked.eq(true))
            .execute(conn)
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Session, UserInput};
    use crate::orm::login::{create_and_store_session, hash_password};
    use crate::orm::testing::{setup_test_db, setup_test_dbconn};
    use crate::orm::user::insert_user;

    #[tokio::test]
    async fn test_revoke_session() {
        let mut conn = setup_test_db();
        let user = insert_user(
            &mut conn,
            UserInput {
                email: "rohan@greenops.example".to_string(),
                password_hash: hash_password("pw"),
                is_superuser: false,
            },
        )
        .unwrap();
        let db = setup_test_dbconn(conn);

        let token = create_and_store_session(&db, user.id).await.unwrap();
        assert_eq!(revoke_session(&db, &token).await.unwrap(), 1);
        assert_eq!(revoke_session(&db, "no-such-session").await.unwrap(), 0);

        let session = db
            .run(move |conn| sessions.filter(id.eq(&token)).first::<Session>(conn))
            .await
            .unwrap();
        assert!(session.revoked);
    }
}
