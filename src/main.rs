use actix_cors::Cors;
use actix_web::{self, middleware::Logger, web, App, HttpServer};
use std::{
    sync::{Arc, LazyLock},
    time::Duration,
};

use crate::{
    configs::{connect_database, create_redis_pool},
    modules::{
        friend::{repository_pg::FriendRepositoryPg, service::FriendService},
        rate_limit::{
            memory::InMemoryRateLimiter, redis::RedisRateLimiter, RateLimitPolicy, RateLimiter,
        },
        user::{repository_pg::UserRepositoryPg, service::UserService},
    },
    utils::TokenSettings,
};

mod api;
mod configs;
mod constants;
mod middlewares;
mod modules;
#[cfg(test)]
mod test;
mod utils;

pub static ENV: LazyLock<constants::Env> = LazyLock::new(|| {
    dotenvy::dotenv().ok();
    env_logger::init();
    log::info!("Environment variables loaded from .env file");
    constants::Env::default()
});

#[actix_web::get("/")]
async fn health_check() -> &'static str {
    "Server is running"
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let db_pool =
        connect_database().await.map_err(|_| std::io::Error::other("Database connection error"))?;

    let policy = RateLimitPolicy::new(
        ENV.friend_request_limit,
        Duration::from_secs(ENV.friend_request_window),
    );
    let limiter: Arc<dyn RateLimiter> = match ENV.redis_url.as_deref() {
        Some(url) => {
            let redis_pool = create_redis_pool(url)
                .map_err(|_| std::io::Error::other("Redis connection error"))?;
            Arc::new(RedisRateLimiter::new(redis_pool, policy))
        }
        None => Arc::new(InMemoryRateLimiter::new(policy)),
    };

    let tokens = TokenSettings::new(
        ENV.jwt_secret.clone(),
        ENV.access_token_expiration,
        ENV.refresh_token_expiration,
    );

    let user_repo = Arc::new(UserRepositoryPg::new(db_pool.clone()));
    let friend_repo = Arc::new(FriendRepositoryPg::new(db_pool.clone()));

    let user_service = UserService::with_dependencies(user_repo.clone(), tokens.clone());
    let friend_service = FriendService::with_dependencies(friend_repo, user_repo, limiter);

    log::info!("Starting server at http://{}:{}", ENV.ip.as_str(), ENV.port);
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(ENV.frontend_url.as_str())
            .allow_any_method()
            .allow_any_header()
            .supports_credentials();

        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .app_data(web::Data::new(user_service.clone()))
            .app_data(web::Data::new(friend_service.clone()))
            .app_data(web::Data::new(tokens.clone()))
            .service(health_check)
            .service(web::scope("/api").configure(modules::configure))
    })
    .bind((ENV.ip.as_str(), ENV.port))?
    .workers(2)
    .run()
    .await
}
