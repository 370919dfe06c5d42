use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        friend::{
            model::{PendingRequestResponse, PendingRequestRow},
            repository::FriendRepository,
            schema::FriendRequestEntity,
        },
        user::schema::UserEntity,
    },
};

#[derive(Clone)]
pub struct FriendRepositoryPg {
    pool: sqlx::PgPool,
}

impl FriendRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl FriendRepository for FriendRepositoryPg {
    async fn create_friend_request(
        &self,
        sender_id: &Uuid,
        receiver_id: &Uuid,
    ) -> Result<FriendRequestEntity, error::SystemError> {
        let id = Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext));
        let request = sqlx::query_as::<_, FriendRequestEntity>(
            r#"
            INSERT INTO friend_requests (id, sender_id, receiver_id)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(sender_id)
        .bind(receiver_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(request)
    }

    async fn accept_pending_request(
        &self,
        sender_id: &Uuid,
        receiver_id: &Uuid,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError> {
        let request = sqlx::query_as::<_, FriendRequestEntity>(
            r#"
            UPDATE friend_requests
            SET accepted = TRUE
            WHERE sender_id = $1 AND receiver_id = $2 AND accepted = FALSE
            RETURNING *
            "#,
        )
        .bind(sender_id)
        .bind(receiver_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    async fn delete_pending_request(
        &self,
        sender_id: &Uuid,
        receiver_id: &Uuid,
    ) -> Result<bool, error::SystemError> {
        let rows = sqlx::query(
            "DELETE FROM friend_requests WHERE sender_id = $1 AND receiver_id = $2 AND accepted = FALSE",
        )
        .bind(sender_id)
        .bind(receiver_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(rows > 0)
    }

    async fn find_friends(&self, user_id: &Uuid) -> Result<Vec<UserEntity>, error::SystemError> {
        let friends = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT u.*
            FROM users u
            WHERE u.id IN (
                SELECT sender_id FROM friend_requests
                WHERE receiver_id = $1 AND accepted = TRUE
            )
            OR u.id IN (
                SELECT receiver_id FROM friend_requests
                WHERE sender_id = $1 AND accepted = TRUE
            )
            ORDER BY u.first_name, u.last_name, u.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(friends)
    }

    async fn find_pending_requests(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<PendingRequestResponse>, error::SystemError> {
        let rows = sqlx::query_as::<_, PendingRequestRow>(
            r#"
            SELECT
                fr.id,
                fr.accepted,
                fr.created_at,
                u.id AS sender_id,
                u.email AS sender_email,
                u.first_name AS sender_first_name,
                u.last_name AS sender_last_name
            FROM friend_requests fr
            JOIN users u
                ON fr.sender_id = u.id
            WHERE fr.receiver_id = $1 AND fr.accepted = FALSE
            ORDER BY fr.created_at, fr.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(PendingRequestResponse::from).collect())
    }
}
