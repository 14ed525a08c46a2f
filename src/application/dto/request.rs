//! Request DTOs
//!
//! Data structures for entity request bodies. Creating and editing an entity
//! go through separate parse functions: creation requires every mandatory
//! field, while an edit accepts any subset and leaves omitted fields alone.

use serde::{de::DeserializeOwned, Deserialize};
use validator::Validate;

use crate::shared::error::AppError;
use crate::shared::validation::validation_error;

/// Create user request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewUserRequest {
    #[validate(length(min = 1, max = 64, message = "First name must be 1-64 characters"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 64, message = "Second name must be 1-64 characters"))]
    pub second_name: String,

    #[validate(length(min = 2, max = 32, message = "Username must be 2-32 characters"))]
    pub username: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Edit user request
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserEditRequest {
    #[validate(length(min = 1, max = 64, message = "First name must be 1-64 characters"))]
    pub first_name: Option<String>,

    #[validate(length(min = 1, max = 64, message = "Second name must be 1-64 characters"))]
    pub second_name: Option<String>,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,
}

/// Create thread request
#[derive(Debug, Deserialize, Validate)]
pub struct NewThreadRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
}

/// Edit thread request
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ThreadEditRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,
}

/// Create message request
#[derive(Debug, Deserialize, Validate)]
pub struct NewMessageRequest {
    #[validate(length(min = 1, max = 4000, message = "Content must be 1-4000 characters"))]
    pub content: String,
}

/// Edit message request
#[derive(Debug, Default, Deserialize, Validate)]
pub struct MessageEditRequest {
    #[validate(length(min = 1, max = 4000, message = "Content must be 1-4000 characters"))]
    pub content: Option<String>,
}

pub fn parse_user_create(body: &[u8]) -> Result<NewUserRequest, AppError> {
    parse_create(body)
}

pub fn parse_user_edit(body: &[u8]) -> Result<UserEditRequest, AppError> {
    parse_edit(body)
}

pub fn parse_thread_create(body: &[u8]) -> Result<NewThreadRequest, AppError> {
    parse_create(body)
}

pub fn parse_thread_edit(body: &[u8]) -> Result<ThreadEditRequest, AppError> {
    parse_edit(body)
}

pub fn parse_message_create(body: &[u8]) -> Result<NewMessageRequest, AppError> {
    parse_create(body)
}

pub fn parse_message_edit(body: &[u8]) -> Result<MessageEditRequest, AppError> {
    parse_edit(body)
}

fn parse_create<T: DeserializeOwned + Validate>(body: &[u8]) -> Result<T, AppError> {
    let request: T = serde_json::from_slice(body)
        .map_err(|e| AppError::Validation(format!("invalid request body: {}", e)))?;
    request.validate().map_err(validation_error)?;
    Ok(request)
}

/// An empty body is an edit that changes nothing.
fn parse_edit<T: DeserializeOwned + Validate + Default>(body: &[u8]) -> Result<T, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    parse_create(body)
}
