// ABOUTME: Per-request time budget rendered through the standard error envelope
// ABOUTME: A request that overruns is dropped and answered with 408 REQUEST_TIMEOUT
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitcoach Analytics

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use fitcoach_core::errors::AppError;
use std::time::Duration;
use tokio::time::timeout;
use tracing::warn;

/// Run the rest of the stack within `budget`
pub async fn request_timeout(
    State(budget): State<Duration>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    match timeout(budget, next.run(request)).await {
        Ok(response) => response,
        Err(_) => {
            warn!(%method, %uri, budget_ms = budget.as_millis(), "Request exceeded its time budget");
            AppError::request_timeout(format!(
                "Request did not complete within {}ms",
                budget.as_millis()
            ))
            .into_response()
        }
    }
}
