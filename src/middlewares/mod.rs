use actix_web::{
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
    web, Error, HttpMessage, HttpRequest,
};

use crate::{
    api::error,
    utils::{TokenSettings, TokenType},
};

pub async fn authentication<B>(
    req: ServiceRequest,
    next: Next<B>,
) -> Result<ServiceResponse<B>, Error>
where
    B: MessageBody + 'static,
{
    let auth = req.headers().get("Authorization").and_then(|h| h.to_str().ok());
    let token = match auth.and_then(|h| h.strip_prefix("Bearer ")) {
        Some(t) => t,
        None => {
            return Err(
                error::Error::unauthorized("Authentication credentials were not provided").into()
            );
        }
    };

    let settings = req.app_data::<web::Data<TokenSettings>>().cloned().ok_or_else(|| {
        log::error!("TokenSettings missing from app data");
        error::Error::internal_server_error()
    })?;

    let claims = settings
        .verify(token, TokenType::Access)
        .map_err(|_| error::Error::unauthorized("Token Invalid or Expired"))?;

    req.extensions_mut().insert(claims);

    next.call(req).await
}

pub fn get_extensions<T>(req: &HttpRequest) -> Result<T, error::Error>
where
    T: Clone + 'static,
{
    req.extensions()
        .get::<T>()
        .cloned()
        .ok_or_else(|| error::Error::unauthorized("Unauthorized"))
}
