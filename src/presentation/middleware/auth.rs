//! Authentication Middleware
//!
//! HTTP Basic authentication for entity routes. The authenticated
//! [`Requestor`] is stored in the request extensions for handlers to pick up.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::WWW_AUTHENTICATE, HeaderValue, Method},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::headers::{authorization::Basic, Authorization, HeaderMapExt};

use crate::domain::{Authenticator, Credentials, Requestor};
use crate::shared::error::AppError;

/// State shared by every instance of the auth middleware.
#[derive(Clone)]
pub struct AuthState {
    authenticator: Arc<dyn Authenticator>,
    challenge: HeaderValue,
}

impl AuthState {
    /// Fails if `realm` cannot be carried in a header value.
    pub fn new(authenticator: Arc<dyn Authenticator>, realm: &str) -> Result<Self, AppError> {
        let challenge = HeaderValue::from_str(&format!("Basic realm=\"{}\"", realm))
            .map_err(|e| AppError::Internal(format!("invalid auth realm '{}': {}", realm, e)))?;
        Ok(Self {
            authenticator,
            challenge,
        })
    }

    fn reject(&self, err: AppError) -> Response {
        let mut response = err.into_response();
        response
            .headers_mut()
            .insert(WWW_AUTHENTICATE, self.challenge.clone());
        response
    }
}

/// Authentication middleware validating Basic credentials.
///
/// `OPTIONS` requests pass through unauthenticated.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    if request.method() == Method::OPTIONS {
        return next.run(request).await;
    }

    let Some(Authorization(basic)) = request.headers().typed_get::<Authorization<Basic>>() else {
        return state.reject(AppError::Unauthorized("missing basic credentials".into()));
    };
    let credentials = Credentials {
        username: basic.username().to_string(),
        password: basic.password().to_string(),
    };

    match state.authenticator.authenticate(&credentials).await {
        Ok(requestor) => {
            if let Requestor::User(identity) = &requestor {
                tracing::debug!(user_id = %identity.id, "request authenticated");
            }
            request.extensions_mut().insert(requestor);
            next.run(request).await
        }
        Err(err @ AppError::Unauthorized(_)) => state.reject(err),
        Err(err) => err.into_response(),
    }
}
