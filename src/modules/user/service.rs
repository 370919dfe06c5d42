use log::info;
use std::sync::{Arc, LazyLock};

use crate::api::error;
use crate::constants::SEARCH_PAGE_SIZE;
use crate::modules::user::model::{
    resolve_page, InsertUser, RefreshTokenModel, SignInModel, SignUpModel, UserFilter,
    UserResponse,
};
use crate::modules::user::repository::UserRepository;
use crate::utils::{hash_password, verify_password, TokenSettings, TokenType};

/// Verified against when the email is unknown, so a miss costs one argon2 run too.
static DUMMY_HASH: LazyLock<String> = LazyLock::new(|| {
    hash_password("dummy-password").expect("argon2 hashes a fixed password with default params")
});

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository + Send + Sync>,
    tokens: TokenSettings,
}

impl UserService {
    pub fn with_dependencies(
        repo: Arc<dyn UserRepository + Send + Sync>,
        tokens: TokenSettings,
    ) -> Self {
        info!("UserService initialized with dependencies");
        UserService { repo, tokens }
    }

    pub async fn sign_up(&self, user: SignUpModel) -> Result<uuid::Uuid, error::SystemError> {
        let email = user.email.trim().to_lowercase();

        if self.repo.find_by_email(&email).await?.is_some() {
            return Err(error::SystemError::DuplicateAccount);
        }

        let new_user = InsertUser {
            email,
            hash_password: hash_password(&user.password)?,
            first_name: user.first_name,
            last_name: user.last_name,
        };

        let user_id = self.repo.create(&new_user).await.map_err(|e| {
            if e.is_conflict() {
                error::SystemError::DuplicateAccount
            } else {
                e
            }
        })?;
        info!("Account {} created", user_id);
        Ok(user_id)
    }

    pub async fn sign_in(&self, user: SignInModel) -> Result<(String, String), error::SystemError> {
        let email = user.email.trim().to_lowercase();

        let Some(user_entity) = self.repo.find_by_email(&email).await? else {
            let _ = verify_password(&DUMMY_HASH, &user.password);
            return Err(error::SystemError::InvalidCredentials);
        };

        if !verify_password(&user_entity.hash_password, &user.password)? {
            return Err(error::SystemError::InvalidCredentials);
        }

        let access_token = self.tokens.issue(&user_entity.id, TokenType::Access)?;
        let refresh_token = self.tokens.issue(&user_entity.id, TokenType::Refresh)?;

        Ok((access_token, refresh_token))
    }

    pub async fn refresh(&self, model: RefreshTokenModel) -> Result<String, error::SystemError> {
        let claims = self
            .tokens
            .verify(&model.refresh, TokenType::Refresh)
            .map_err(|_| error::SystemError::unauthorized("Token Invalid or Expired"))?;

        self.repo
            .find_by_id(&claims.sub)
            .await?
            .ok_or_else(|| error::SystemError::unauthorized("Token Invalid or Expired"))?;

        self.tokens.issue(&claims.sub, TokenType::Access)
    }

    pub async fn search(
        &self,
        query: &str,
        page: Option<&str>,
    ) -> Result<Vec<UserResponse>, error::SystemError> {
        let filter = UserFilter::from_query(query);

        let total = self.repo.count_users(&filter).await?;
        let page = resolve_page(page, total, SEARCH_PAGE_SIZE);
        let offset = (page - 1) * SEARCH_PAGE_SIZE;

        let users = self.repo.search_users(&filter, SEARCH_PAGE_SIZE, offset).await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }
}
