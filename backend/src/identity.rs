//! Owner identification
//!
//! Requests may carry an `X-Owner-Id` header naming the account that owns
//! the data. Without it the request acts on the local (anonymous) user.

use crate::error::ApiError;
use axum::http::request::Parts;

pub const OWNER_HEADER: &str = "x-owner-id";

const MAX_OWNER_ID_LEN: usize = 128;

/// Owner extracted from the request headers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Owner(Option<String>);

impl Owner {
    pub fn local() -> Self {
        Self(None)
    }

    pub fn account(id: impl Into<String>) -> Self {
        Self(Some(id.into()))
    }

    pub fn id(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn into_inner(self) -> Option<String> {
        self.0
    }
}

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for Owner
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(OWNER_HEADER) else {
            return Ok(Owner::local());
        };

        let id = value
            .to_str()
            .map_err(|_| ApiError::BadRequest("Owner id must be visible ASCII".to_string()))?
            .trim();

        if id.is_empty() {
            return Ok(Owner::local());
        }
        if id.len() > MAX_OWNER_ID_LEN {
            return Err(ApiError::BadRequest(format!(
                "Owner id must be at most {} characters",
                MAX_OWNER_ID_LEN
            )));
        }

        Ok(Owner::account(id))
    }
}
