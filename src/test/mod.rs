//! In-memory stores standing in for PostgreSQL, plus HTTP-level tests that
//! drive the full actix app through them.
use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use crate::{
    api::error::{self, DbErrorMeta},
    modules::{
        friend::{
            model::PendingRequestResponse, repository::FriendRepository,
            schema::FriendRequestEntity, service::FriendService,
        },
        rate_limit::{memory::InMemoryRateLimiter, RateLimitPolicy},
        user::{
            model::{InsertUser, UserFilter, UserResponse},
            repository::UserRepository,
            schema::UserEntity,
            service::UserService,
        },
    },
    utils::{TokenSettings, TokenType},
};


fn conflict(constraint: &str) -> error::SystemError {
    error::SystemError::Conflict(Some(DbErrorMeta {
        code: Some("23505".to_string()),
        constraint: Some(constraint.to_string()),
        message: "duplicate key value violates unique constraint".to_string(),
    }))
}

/// Rows kept in insertion order, with the same unique constraints as the schema.
#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<Vec<UserEntity>>,
    requests: Mutex<Vec<FriendRequestEntity>>,
}

impl MemoryStore {
    /// Inserts an account without hashing a password.
    pub fn insert_user(&self, email: &str, first_name: &str, last_name: &str) -> Uuid {
        let id = Uuid::now_v7();
        self.users.lock().unwrap().push(UserEntity {
            id,
            email: email.to_lowercase(),
            hash_password: String::new(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
        });
        id
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn matches(user: &UserEntity, filter: &UserFilter) -> bool {
        match filter {
            UserFilter::Email(email) => user.email.eq_ignore_ascii_case(email),
            UserFilter::Name(name) => {
                let name = name.to_lowercase();
                user.first_name.to_lowercase().contains(&name)
                    || user.last_name.to_lowercase().contains(&name)
            }
        }
    }
}

#[async_trait::async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<UserEntity>, error::SystemError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == *id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>, error::SystemError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.email.eq_ignore_ascii_case(email)).cloned())
    }

    async fn create(&self, user: &InsertUser) -> Result<Uuid, error::SystemError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
            return Err(conflict("users_email_key"));
        }
        let id = Uuid::now_v7();
        users.push(UserEntity {
            id,
            email: user.email.clone(),
            hash_password: user.hash_password.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
        });
        Ok(id)
    }

    async fn count_users(&self, filter: &UserFilter) -> Result<i64, error::SystemError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().filter(|u| Self::matches(u, filter)).count() as i64)
    }

    async fn search_users(
        &self,
        filter: &UserFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<UserEntity>, error::SystemError> {
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .filter(|u| Self::matches(u, filter))
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

#[async_trait::async_trait]
impl FriendRepository for MemoryStore {
    async fn create_friend_request(
        &self,
        sender_id: &Uuid,
        receiver_id: &Uuid,
    ) -> Result<FriendRequestEntity, error::SystemError> {
        let mut requests = self.requests.lock().unwrap();
        if requests.iter().any(|r| r.sender_id == *sender_id && r.receiver_id == *receiver_id) {
            return Err(conflict("friend_requests_sender_receiver_key"));
        }
        let request = FriendRequestEntity {
            id: Uuid::now_v7(),
            sender_id: *sender_id,
            receiver_id: *receiver_id,
            accepted: false,
            created_at: chrono::Utc::now(),
        };
        requests.push(request.clone());
        Ok(request)
    }

    async fn accept_pending_request(
        &self,
        sender_id: &Uuid,
        receiver_id: &Uuid,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError> {
        let mut requests = self.requests.lock().unwrap();
        let pending = requests.iter_mut().find(|r| {
            r.sender_id == *sender_id && r.receiver_id == *receiver_id && !r.accepted
        });
        Ok(pending.map(|r| {
            r.accepted = true;
            r.clone()
        }))
    }

    async fn delete_pending_request(
        &self,
        sender_id: &Uuid,
        receiver_id: &Uuid,
    ) -> Result<bool, error::SystemError> {
        let mut requests = self.requests.lock().unwrap();
        let before = requests.len();
        requests.retain(|r| {
            !(r.sender_id == *sender_id && r.receiver_id == *receiver_id && !r.accepted)
        });
        Ok(requests.len() < before)
    }

    async fn find_friends(&self, user_id: &Uuid) -> Result<Vec<UserEntity>, error::SystemError> {
        let friend_ids: Vec<Uuid> = self
            .requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.accepted)
            .filter_map(|r| match (r.sender_id == *user_id, r.receiver_id == *user_id) {
                (true, _) => Some(r.receiver_id),
                (_, true) => Some(r.sender_id),
                _ => None,
            })
            .collect();

        let mut friends: Vec<UserEntity> = self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| friend_ids.contains(&u.id))
            .cloned()
            .collect();
        friends.sort_by(|a, b| {
            (&a.first_name, &a.last_name, a.id).cmp(&(&b.first_name, &b.last_name, b.id))
        });
        Ok(friends)
    }

    async fn find_pending_requests(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<PendingRequestResponse>, error::SystemError> {
        let requests = self.requests.lock().unwrap();
        let users = self.users.lock().unwrap();
        Ok(requests
            .iter()
            .filter(|r| r.receiver_id == *user_id && !r.accepted)
            .filter_map(|r| {
                let sender = users.iter().find(|u| u.id == r.sender_id)?;
                Some(PendingRequestResponse {
                    id: r.id,
                    sender: UserResponse::from(sender.clone()),
                    accepted: r.accepted,
                    created_at: r.created_at,
                })
            })
            .collect())
    }
}

/// Pool on `DATABASE_URL` with migrations applied, or `None` when no database
/// is configured. Tests sharing the database use unique emails and only assert
/// on rows they created.
pub async fn test_pool() -> Option<PgPool> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        log::warn!("DATABASE_URL not set, skipping PostgreSQL test");
        return None;
    };
    let pool = PgPoolOptions::new().max_connections(2).connect(&url).await.unwrap();
    sqlx::migrate!("./migrations").run(&pool).await.unwrap();
    Some(pool)
}

pub fn unique_email(name: &str) -> String {
    format!("{name}.{}@example.com", Uuid::now_v7().simple())
}

pub fn token_settings() -> TokenSettings {
    TokenSettings::new("test-secret", 900, 604800)
}

/// Services wired to one shared [`MemoryStore`].
pub struct TestState {
    pub store: Arc<MemoryStore>,
    pub tokens: TokenSettings,
    pub user_service: UserService,
    pub friend_service: FriendService,
}

impl TestState {
    pub fn new(limit: usize) -> Self {
        let store = Arc::new(MemoryStore::default());
        let tokens = token_settings();
        let limiter = Arc::new(InMemoryRateLimiter::new(RateLimitPolicy::new(
            limit,
            Duration::from_secs(60),
        )));
        let user_service = UserService::with_dependencies(store.clone(), tokens.clone());
        let friend_service =
            FriendService::with_dependencies(store.clone(), store.clone(), limiter);
        Self { store, tokens, user_service, friend_service }
    }

    /// Seeds an account and returns its id with a valid access token.
    pub fn user(&self, email: &str, first_name: &str, last_name: &str) -> (Uuid, String) {
        let id = self.store.insert_user(email, first_name, last_name);
        let token = self.tokens.issue(&id, TokenType::Access).unwrap();
        (id, token)
    }
}
