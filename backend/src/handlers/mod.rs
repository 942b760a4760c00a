//! HTTP request handlers

use axum::{http::StatusCode, Json};

mod client;
mod inventory;
mod product;
mod quote;
mod sale;

pub use client::*;
pub use inventory::*;
pub use product::*;
pub use quote::*;
pub use sale::*;

/// Response pair for handlers that create a resource.
pub(crate) fn created<T>(body: T) -> (StatusCode, Json<T>) {
    (StatusCode::CREATED, Json(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[test]
    fn created_responses_use_http_201() {
        let response = created("ok").into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}
