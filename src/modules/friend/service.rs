use std::sync::Arc;

use log::{debug, info};
use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        friend::{
            model::{FriendAction, FriendRequestOutcome, PendingRequestResponse},
            repository::FriendRepository,
        },
        rate_limit::RateLimiter,
        user::{model::UserResponse, repository::UserRepository},
    },
};

#[derive(Clone)]
pub struct FriendService {
    friend_repo: Arc<dyn FriendRepository + Send + Sync>,
    user_repo: Arc<dyn UserRepository + Send + Sync>,
    limiter: Arc<dyn RateLimiter>,
}

fn rate_limit_key(sender_id: &Uuid) -> String {
    format!("friend_request:{sender_id}")
}

impl FriendService {
    pub fn with_dependencies(
        friend_repo: Arc<dyn FriendRepository + Send + Sync>,
        user_repo: Arc<dyn UserRepository + Send + Sync>,
        limiter: Arc<dyn RateLimiter>,
    ) -> Self {
        info!("FriendService initialized with dependencies");
        FriendService { friend_repo, user_repo, limiter }
    }

    async fn ensure_user_exists(&self, user_id: &Uuid) -> Result<(), error::SystemError> {
        match self.user_repo.find_by_id(user_id).await? {
            Some(_) => Ok(()),
            None => Err(error::SystemError::not_found("Receiver does not exist")),
        }
    }

    /// Runs a path action against `other_id`. An unknown action is reported only
    /// once the other user is known to exist.
    pub async fn apply_action(
        &self,
        user_id: Uuid,
        other_id: Uuid,
        action: &str,
    ) -> Result<FriendRequestOutcome, error::SystemError> {
        match action.parse::<FriendAction>() {
            Ok(FriendAction::Send) => {
                self.send_friend_request(user_id, other_id).await.map(FriendRequestOutcome::Sent)
            }
            Ok(FriendAction::Accept) => {
                self.accept_friend_request(user_id, other_id).await?;
                Ok(FriendRequestOutcome::Accepted)
            }
            Ok(FriendAction::Reject) => {
                self.reject_friend_request(user_id, other_id).await?;
                Ok(FriendRequestOutcome::Rejected)
            }
            Err(err) => {
                self.ensure_user_exists(&other_id).await?;
                Err(err)
            }
        }
    }

    pub async fn send_friend_request(
        &self,
        sender_id: Uuid,
        receiver_id: Uuid,
    ) -> Result<Uuid, error::SystemError> {
        self.ensure_user_exists(&receiver_id).await?;

        if !self.limiter.try_acquire(&rate_limit_key(&sender_id)).await? {
            debug!("Friend request from {} rate limited", sender_id);
            return Err(error::SystemError::RateLimited);
        }

        let request =
            self.friend_repo.create_friend_request(&sender_id, &receiver_id).await.map_err(
                |e| {
                    if e.is_conflict() {
                        error::SystemError::validation("Friend request already exists")
                    } else {
                        e
                    }
                },
            )?;

        info!("Friend request {} sent from {} to {}", request.id, sender_id, receiver_id);
        Ok(request.id)
    }

    /// `sender_id` is the user who originally sent the request to `user_id`.
    pub async fn accept_friend_request(
        &self,
        user_id: Uuid,
        sender_id: Uuid,
    ) -> Result<(), error::SystemError> {
        self.ensure_user_exists(&sender_id).await?;

        let request = self
            .friend_repo
            .accept_pending_request(&sender_id, &user_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Friend request does not exist"))?;

        info!("Friend request {} accepted", request.id);
        Ok(())
    }

    pub async fn reject_friend_request(
        &self,
        user_id: Uuid,
        sender_id: Uuid,
    ) -> Result<(), error::SystemError> {
        self.ensure_user_exists(&sender_id).await?;

        if !self.friend_repo.delete_pending_request(&sender_id, &user_id).await? {
            return Err(error::SystemError::not_found("Friend request does not exist"));
        }

        info!("Friend request from {} to {} rejected", sender_id, user_id);
        Ok(())
    }

    pub async fn get_friends(&self, user_id: Uuid) -> Result<Vec<UserResponse>, error::SystemError> {
        let friends = self.friend_repo.find_friends(&user_id).await?;
        Ok(friends.into_iter().map(UserResponse::from).collect())
    }

    pub async fn get_pending_requests(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<PendingRequestResponse>, error::SystemError> {
        self.friend_repo.find_pending_requests(&user_id).await
    }
}
