use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        friend::{model::PendingRequestResponse, schema::FriendRequestEntity},
        user::schema::UserEntity,
    },
};

#[async_trait::async_trait]
pub trait FriendRepository {
    /// Inserts a pending request. A second row for the same ordered pair is
    /// rejected by the store with [`error::SystemError::Conflict`].
    async fn create_friend_request(
        &self,
        sender_id: &Uuid,
        receiver_id: &Uuid,
    ) -> Result<FriendRequestEntity, error::SystemError>;

    /// Flips a pending request to accepted. `None` when no pending row exists.
    async fn accept_pending_request(
        &self,
        sender_id: &Uuid,
        receiver_id: &Uuid,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError>;

    /// Deletes a pending request, returning whether one existed.
    async fn delete_pending_request(
        &self,
        sender_id: &Uuid,
        receiver_id: &Uuid,
    ) -> Result<bool, error::SystemError>;

    /// Accounts with an accepted request to or from `user_id`.
    async fn find_friends(&self, user_id: &Uuid) -> Result<Vec<UserEntity>, error::SystemError>;

    /// Pending requests addressed to `user_id`, oldest first.
    async fn find_pending_requests(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<PendingRequestResponse>, error::SystemError>;
}
