use actix_web::{get, post, web};

use crate::{
    api::{error, success},
    modules::user::{model, service::UserService},
    utils::{ValidatedJson, ValidatedQuery},
};

#[post("/signup")]
pub async fn sign_up(
    user_service: web::Data<UserService>,
    user_data: ValidatedJson<model::SignUpModel>,
) -> Result<success::Success<()>, error::Error> {
    user_service.sign_up(user_data.0).await?;
    Ok(success::Success::created(None).message("User registered successfully"))
}

#[post("/login")]
pub async fn sign_in(
    user_service: web::Data<UserService>,
    user_data: ValidatedJson<model::SignInModel>,
) -> Result<success::Success<model::SignInResponse>, error::Error> {
    let (access, refresh_token) = user_service.sign_in(user_data.0).await?;
    Ok(success::Success::ok(Some(model::SignInResponse { access, refresh: refresh_token }))
        .message("Login successful"))
}

#[post("/token/refresh")]
pub async fn refresh(
    user_service: web::Data<UserService>,
    body: ValidatedJson<model::RefreshTokenModel>,
) -> Result<success::Success<model::RefreshResponse>, error::Error> {
    let access = user_service.refresh(body.0).await?;
    Ok(success::Success::ok(Some(model::RefreshResponse { access }))
        .message("Token refreshed successfully"))
}

#[get("/search")]
pub async fn search_users(
    user_service: web::Data<UserService>,
    query: ValidatedQuery<model::SearchQuery>,
) -> Result<success::Success<Vec<model::UserResponse>>, error::Error> {
    let query = query.0;
    let users = user_service.search(&query.q, query.page.as_deref()).await?;
    Ok(success::Success::ok(Some(users)).message("Users retrieved successfully"))
}
