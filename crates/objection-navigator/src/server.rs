//! Outer service stack
//!
//! Wraps the router with the guards every request passes through, outermost
//! first: tracing, CORS, the overall deadline, the concurrency cap, and the
//! panic guard that turns any escaped failure into a 500.

use axum::{middleware, response::IntoResponse, Router};
use std::any::Any;
use tower::{limit::GlobalConcurrencyLimitLayer, ServiceBuilder};
use tower_http::{catch_panic::CatchPanicLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::handler::{cors_middleware, create_router, ApiError, AppState};

/// The complete application as served
pub fn build_app(state: AppState) -> Router {
    let config = state.config.clone();
    let cors = state.cors.clone();
    let metrics = state.metrics.clone();

    let on_panic = move |panic: Box<dyn Any + Send + 'static>| {
        tracing::error!(panic = panic_message(&*panic), "Unhandled failure in request");
        metrics.record_request(ApiError::Internal.outcome());
        ApiError::Internal.into_response()
    };

    create_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(middleware::from_fn_with_state(cors, cors_middleware))
            .layer(TimeoutLayer::new(config.request_timeout()))
            .layer(GlobalConcurrencyLimitLayer::new(config.max_concurrency))
            .layer(CatchPanicLayer::custom(on_panic)),
    )
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(msg) = panic.downcast_ref::<&'static str>() {
        *msg
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "unknown panic"
    }
}

/// Resolves on Ctrl-C or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining requests");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_message() {
        let boxed: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(boxed.as_ref()), "boom");

        let boxed: Box<dyn Any + Send> = Box::new(String::from("owned boom"));
        assert_eq!(panic_message(boxed.as_ref()), "owned boom");

        let boxed: Box<dyn Any + Send> = Box::new(42u8);
        assert_eq!(panic_message(boxed.as_ref()), "unknown panic");
    }
}
