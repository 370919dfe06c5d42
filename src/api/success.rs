use actix_web::{http::StatusCode, HttpResponse};
use std::borrow::Cow;

use crate::api::Envelope;

pub struct Success<T: serde::Serialize> {
    pub status: StatusCode,
    pub data: Option<T>,
    pub message: Cow<'static, str>,
}

impl<T: serde::Serialize> Success<T> {
    pub fn ok(data: Option<T>) -> Self {
        Self { status: StatusCode::OK, data, message: "OK".into() }
    }

    pub fn created(data: Option<T>) -> Self {
        Self { status: StatusCode::CREATED, data, message: "Created".into() }
    }

    pub fn message<M>(mut self, msg: M) -> Self
    where
        M: Into<Cow<'static, str>>,
    {
        self.message = msg.into();
        self
    }
}

impl<T: serde::Serialize> actix_web::Responder for Success<T> {
    type Body = actix_web::body::BoxBody;

    fn respond_to(self, _req: &actix_web::HttpRequest) -> HttpResponse<Self::Body> {
        HttpResponse::build(self.status).json(Envelope {
            message: self.message,
            data: self.data,
            status_code: self.status.as_u16(),
        })
    }
}
