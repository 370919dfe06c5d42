use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use crate::{api::error, modules::user::model::UserResponse};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FriendAction {
    Send,
    Accept,
    Reject,
}

impl FromStr for FriendAction {
    type Err = error::SystemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "send" => Ok(FriendAction::Send),
            "accept" => Ok(FriendAction::Accept),
            "reject" => Ok(FriendAction::Reject),
            _ => Err(error::SystemError::validation("Invalid action")),
        }
    }
}

/// What a `/friend-request/{action}` call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FriendRequestOutcome {
    Sent(Uuid),
    Accepted,
    Rejected,
}

/// For `accept` and `reject`, `receiver_id` names the user who sent the request.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FriendRequestBody {
    pub receiver_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct FriendRequestCreated {
    pub friend_request_id: Uuid,
}

#[derive(sqlx::FromRow)]
pub struct PendingRequestRow {
    pub id: Uuid,
    pub accepted: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub sender_id: Uuid,
    pub sender_email: String,
    pub sender_first_name: String,
    pub sender_last_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingRequestResponse {
    pub id: Uuid,
    pub sender: UserResponse,
    pub accepted: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<PendingRequestRow> for PendingRequestResponse {
    fn from(row: PendingRequestRow) -> Self {
        PendingRequestResponse {
            id: row.id,
            sender: UserResponse {
                id: row.sender_id,
                email: row.sender_email,
                first_name: row.sender_first_name,
                last_name: row.sender_last_name,
            },
            accepted: row.accepted,
            created_at: row.created_at,
        }
    }
}
