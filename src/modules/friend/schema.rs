use serde::Serialize;
use sqlx::prelude::FromRow;
use uuid::Uuid;

/// One row per ordered (sender, receiver) pair. `accepted` never goes back to false;
/// a rejected request is deleted instead.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct FriendRequestEntity {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub accepted: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
