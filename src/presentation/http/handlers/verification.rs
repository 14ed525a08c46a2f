//! Credential Verification Handler
//!
//! `GET /verification` lets a client check its Basic credentials. Behind the
//! auth middleware; answers with the identity they belong to.

use axum::{extract::Request, Json};

use crate::domain::{Requestor, UserIdentity};
use crate::shared::error::AppError;

pub async fn verify(request: Request) -> Result<Json<UserIdentity>, AppError> {
    match request.extensions().get::<Requestor>() {
        Some(Requestor::User(identity)) => Ok(Json(identity.clone())),
        Some(Requestor::System) => Err(AppError::Forbidden(
            "the system requestor has no user identity".into(),
        )),
        None => Err(AppError::Unauthorized("request was not authenticated".into())),
    }
}
