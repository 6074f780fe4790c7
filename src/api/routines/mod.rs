mod calculate;
mod list;

pub use calculate::*;
pub use list::*;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::store::RoutineStore;

#[derive(Clone)]
pub struct RoutinesState {
    pub store: Arc<RoutineStore>,
}

pub fn router(store: Arc<RoutineStore>) -> Router {
    let state = RoutinesState { store };
    Router::new()
        .route("/", get(list_routines).post(create_routine))
        .route("/last-schedule", get(last_schedule))
        .route(
            "/selected",
            get(get_selected_routine).put(set_selected_routine),
        )
        .route(
            "/{id}",
            get(get_routine).put(update_routine).delete(delete_routine),
        )
        .route("/{id}/calculate", post(calculate_schedule))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::types::{CalculateResponse, Routine};
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::json;
    use sqlx::sqlite::SqlitePoolOptions;
    use tower::util::ServiceExt;

    async fn test_router() -> Router {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();
        let store = Arc::new(RoutineStore::load(pool).await.unwrap());
        router(store)
    }

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn read_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn morning_routine_body() -> serde_json::Value {
        json!({
            "name": "Morning commute",
            "destination": "Office",
            "defaultArrivalTime": "09:00",
            "steps": [
                { "label": "prepare", "durationMinutes": 10, "type": "prepare" },
                { "label": "walk", "durationMinutes": 15, "type": "walk" },
                { "label": "bus", "durationMinutes": 20, "type": "bus" }
            ]
        })
    }

    async fn create_morning_routine(app: &Router) -> Routine {
        let response = app
            .clone()
            .oneshot(json_request("POST", "/", morning_routine_body()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        read_json(response).await
    }

    #[tokio::test]
    async fn create_then_list_round_trips() {
        let app = test_router().await;
        let created = create_morning_routine(&app).await;
        assert_eq!(created.total_minutes, 45);

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let listed: RoutineListResponse = read_json(response).await;
        assert_eq!(listed.routines.len(), 1);
        assert_eq!(listed.routines[0].id, created.id);
    }

    #[tokio::test]
    async fn calculate_returns_the_backward_schedule() {
        let app = test_router().await;
        let created = create_morning_routine(&app).await;

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/{}/calculate", created.id),
                json!({ "arrivalTime": "09:00", "offsetMinutes": -10 }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let result: CalculateResponse = read_json(response).await;
        assert_eq!(result.arrival_time, "08:50");
        assert_eq!(result.departure_time, "08:05");
        assert_eq!(result.schedule.len(), 3);
    }

    #[tokio::test]
    async fn calculate_rejects_a_malformed_arrival_time() {
        let app = test_router().await;
        let created = create_morning_routine(&app).await;

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/{}/calculate", created.id),
                json!({ "arrivalTime": "nine", "offsetMinutes": 0 }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn calculate_unknown_routine_is_not_found() {
        let app = test_router().await;
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/missing/calculate",
                json!({ "arrivalTime": "09:00", "offsetMinutes": 0 }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn last_schedule_reflects_the_latest_calculation() {
        let app = test_router().await;
        let created = create_morning_routine(&app).await;

        app.clone()
            .oneshot(json_request(
                "POST",
                &format!("/{}/calculate", created.id),
                json!({ "arrivalTime": "09:00", "offsetMinutes": 0 }),
            ))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/last-schedule")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: LastScheduleResponse = read_json(response).await;
        assert_eq!(body.schedule.unwrap().routine_id, created.id);
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let app = test_router().await;
        let created = create_morning_routine(&app).await;

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/{}", created.id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/{}", created.id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn selection_round_trips_and_rejects_unknown_ids() {
        let app = test_router().await;
        let created = create_morning_routine(&app).await;

        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                "/selected",
                json!({ "routineId": created.id }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/selected")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body: SelectedRoutineResponse = read_json(response).await;
        assert_eq!(body.routine.unwrap().id, created.id);

        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                "/selected",
                json!({ "routineId": "missing" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .clone()
            .oneshot(json_request("PUT", "/selected", json!({ "routineId": null })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: SelectedRoutineResponse = read_json(response).await;
        assert!(body.routine.is_none());
    }
}
