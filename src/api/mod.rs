use std::borrow::Cow;

pub mod error;
pub mod success;

/// Body shape shared by every response, successful or not.
#[derive(Debug, serde::Serialize)]
pub struct Envelope<T: serde::Serialize> {
    pub message: Cow<'static, str>,
    pub data: Option<T>,
    pub status_code: u16,
}
