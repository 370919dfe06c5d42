use actix_web::{middleware::from_fn, web};

use crate::middlewares::authentication;

pub mod friend {
    pub mod schema;
    pub mod model;
    pub mod repository;
    pub mod repository_pg;
    pub mod handle;
    pub mod service;
    pub mod route;
}
pub mod rate_limit;
pub mod user {
    pub mod schema;
    pub mod model;
    pub mod repository;
    pub mod repository_pg;
    pub mod handle;
    pub mod service;
    pub mod route;
}

/// Open routes first; everything after them requires an access token.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(user::route::public_api_configure).service(
        web::scope("")
            .wrap(from_fn(authentication))
            .configure(user::route::configure)
            .configure(friend::route::configure),
    );
}
