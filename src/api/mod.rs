pub mod calculator;
pub mod error;
pub mod health;
pub mod routines;

pub use error::{internal_error, ErrorResponse};

use std::sync::Arc;

use axum::Router;

use crate::config::CalculatorConfig;
use crate::store::RoutineStore;

pub fn router(store: Arc<RoutineStore>, calculator: CalculatorConfig) -> Router {
    Router::new()
        .nest("/routines", routines::router(store.clone()))
        .nest("/calculator", calculator::router(calculator))
        .nest("/health", health::router(store))
}
