//! Response helpers. Records go out bare (no envelope); deletions answer with plain text.

use axum::{http::StatusCode, Json};
use serde::Serialize;

pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::CREATED, Json(data))
}

pub fn ok<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::OK, Json(data))
}

pub fn text(message: &'static str) -> (StatusCode, &'static str) {
    (StatusCode::OK, message)
}
