//! Request extractors

use axum::extract::FromRequest;

use crate::AppError;

/// `Json` body whose rejections answer with the `AppError` JSON body
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
