//! API router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    http::HeaderName,
    middleware,
    routing::{delete, get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::booking::{BookingCommitter, LockReaper, SeatSelectionService};
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::interfaces::http::common::error::ConflictBody;
use crate::interfaces::http::common::ApiResponse;
use crate::interfaces::http::middleware::{admin_middleware, auth_middleware, AuthState};
use crate::interfaces::http::modules::{bookings, cleanup, health, metrics, request_id, seats};

/// Everything the routes need
#[derive(Clone)]
pub struct ApiContext {
    pub db: DatabaseConnection,
    pub selection: Arc<SeatSelectionService>,
    pub committer: Arc<BookingCommitter>,
    pub reaper: Arc<LockReaper>,
    pub jwt_config: JwtConfig,
    /// `GET /metrics` is only mounted when a recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token; `sub` is the user email"))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        seats::check_availability,
        seats::select_seats,
        seats::release_seats,
        bookings::create_payment_booking,
        bookings::get_booking,
        bookings::my_bookings,
        bookings::cancel_booking,
        bookings::slot_bookings,
        bookings::all_bookings,
        bookings::admin_cancel_booking,
        cleanup::cleanup_temporary_locks,
        cleanup::cleanup_status,
    ),
    components(
        schemas(
            ApiResponse<String>,
            ConflictBody,
            health::HealthResponse,
            health::ComponentHealth,
            seats::SeatSelectionRequest,
            seats::AvailabilityResponse,
            seats::SelectionResponse,
            seats::SeatDetailDto,
            seats::ReleaseResponse,
            bookings::PaymentBookingRequest,
            bookings::BookingDto,
            bookings::VerificationDto,
            cleanup::CleanupResponse,
            cleanup::CleanupStatusResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service and database health"),
        (name = "Seats", description = "Seat availability and temporary seat locks"),
        (name = "Bookings", description = "Payment commit, booking queries and cancellation"),
        (name = "Cleanup", description = "Admin lock store maintenance"),
    ),
    info(
        title = "Seatlock Booking API",
        version = "1.0.0",
        description = "Seat locking and booking commit for cinema showtimes",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(ctx: ApiContext) -> Router {
    let auth_state = AuthState {
        jwt_config: ctx.jwt_config.clone(),
    };

    // Seat selection is anonymous; the session header correlates requests.
    let seat_routes = Router::new()
        .route("/seats/check-availability", post(seats::check_availability))
        .route("/select-seats", post(seats::select_seats))
        .route("/release-seats", delete(seats::release_seats))
        .with_state(seats::SeatAppState {
            selection: ctx.selection.clone(),
        });

    let booking_state = bookings::BookingAppState {
        committer: ctx.committer.clone(),
        locks: ctx.selection.lock_manager().clone(),
    };

    let booking_routes = Router::new()
        .route("/payment", post(bookings::create_payment_booking))
        .route("/my-bookings", get(bookings::my_bookings))
        .route("/{id}", get(bookings::get_booking))
        .route("/{id}/cancel", delete(bookings::cancel_booking))
        .layer(middleware::from_fn_with_state(
            auth_state.clone(),
            auth_middleware,
        ))
        .with_state(booking_state.clone());

    // Outermost layer runs first: authenticate, then require admin.
    let booking_admin_routes = Router::new()
        .route("/slot/{slot_id}", get(bookings::slot_bookings))
        .route("/admin/all", get(bookings::all_bookings))
        .route("/admin/{id}/cancel", delete(bookings::admin_cancel_booking))
        .layer(middleware::from_fn(admin_middleware))
        .layer(middleware::from_fn_with_state(
            auth_state.clone(),
            auth_middleware,
        ))
        .with_state(booking_state);

    let cleanup_routes = Router::new()
        .route("/temporary-locks", post(cleanup::cleanup_temporary_locks))
        .route("/status", get(cleanup::cleanup_status))
        .layer(middleware::from_fn(admin_middleware))
        .layer(middleware::from_fn_with_state(auth_state, auth_middleware))
        .with_state(cleanup::CleanupAppState {
            reaper: ctx.reaper.clone(),
        });

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(health::HealthState {
            db: ctx.db.clone(),
            started_at: Arc::new(Instant::now()),
        });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([
            HeaderName::from_static(seats::SESSION_HEADER),
            HeaderName::from_static(seats::LOCK_DURATION_HEADER),
        ]);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    let mut router = Router::new()
        .merge(swagger_routes)
        .merge(health_routes)
        .nest(
            "/api/bookings",
            seat_routes.merge(booking_routes).merge(booking_admin_routes),
        )
        .nest("/api/admin/cleanup", cleanup_routes);

    if let Some(handle) = ctx.metrics {
        router = router.merge(
            Router::new()
                .route("/metrics", get(metrics::prometheus_metrics))
                .with_state(metrics::MetricsState { handle }),
        );
    }

    router
        .layer(middleware::from_fn(metrics::http_metrics_middleware))
        .layer(middleware::from_fn(request_id::request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::application::booking::{
        LockManager, RepositoryTicketVerifier, SelectionCache, DEFAULT_SELECTION_TTL,
    };
    use crate::config::CleanupConfig;
    use crate::domain::{RepositoryProvider, Slot};
    use crate::infrastructure::crypto::jwt::create_token;
    use crate::infrastructure::SeaOrmRepositoryProvider;
    use crate::test_support::{memory_db, seed_scenario, ScriptedGateway};

    struct TestApp {
        router: Router,
        slot: Slot,
        repos: Arc<dyn RepositoryProvider>,
        jwt: JwtConfig,
    }

    async fn app() -> TestApp {
        let db = memory_db().await;
        let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
        let slot = seed_scenario(&repos).await;

        let cache = Arc::new(SelectionCache::new(DEFAULT_SELECTION_TTL));
        let locks = Arc::new(LockManager::with_default_duration(repos.clone()));
        let jwt = JwtConfig {
            secret: "test-secret".into(),
            expiration_hours: 1,
            issuer: "seatlock".into(),
        };

        let ctx = ApiContext {
            db,
            selection: Arc::new(SeatSelectionService::new(repos.clone(), locks, cache.clone())),
            committer: Arc::new(BookingCommitter::new(
                repos.clone(),
                ScriptedGateway::approving(),
                Arc::new(RepositoryTicketVerifier::new(repos.clone())),
                cache,
            )),
            reaper: Arc::new(LockReaper::new(repos.clone(), CleanupConfig::default())),
            jwt_config: jwt.clone(),
            metrics: None,
        };

        TestApp {
            router: create_api_router(ctx),
            slot,
            repos,
            jwt,
        }
    }

    impl TestApp {
        fn token(&self, email: &str, role: &str) -> String {
            create_token(email, role, &self.jwt).unwrap()
        }

        async fn send(&self, req: Request<Body>) -> Response {
            self.router.clone().oneshot(req).await.unwrap()
        }
    }

    fn json_req(method: &str, uri: &str, headers: &[(&str, &str)], body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap()
    }

    async fn body_json(resp: Response) -> Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn payment_body(slot_id: i32, seats: &[&str], amount: f64) -> Value {
        json!({
            "slotId": slot_id,
            "seatNumbers": seats,
            "totalAmount": amount,
            "cardNumber": "4111111111111111",
            "cardHolderName": "Jane Roe",
            "expiryDate": "12/29",
            "cvv": "123"
        })
    }

    #[tokio::test]
    async fn health_pings_database() {
        let app = app().await;
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let resp = app.send(req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["database"]["status"], "ok");
    }

    #[tokio::test]
    async fn select_returns_session_headers_and_conflicts_with_409() {
        let app = app().await;
        let body = json!({"slotId": app.slot.id, "seatNumbers": ["A1", "A2"]});

        let req = json_req("POST", "/api/bookings/select-seats", &[("X-Session-ID", "session_x")], body);
        let resp = app.send(req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["x-session-id"], "session_x");
        assert_eq!(resp.headers()["x-lock-duration"], "180");
        let json = body_json(resp).await;
        assert_eq!(json["totalAmount"], 200.0);
        assert_eq!(json["seatDetails"][0]["seatNumber"], "A1");

        let body = json!({"slotId": app.slot.id, "seatNumbers": ["A2", "A3"]});
        let req = json_req("POST", "/api/bookings/select-seats", &[("X-Session-ID", "session_y")], body);
        let resp = app.send(req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let json = body_json(resp).await;
        assert_eq!(json["conflictingSeats"], json!(["A2"]));
        assert_eq!(json["sessionId"], "session_y");
    }

    #[tokio::test]
    async fn select_without_session_derives_one() {
        let app = app().await;
        let body = json!({"slotId": app.slot.id, "seatNumbers": ["A3"]});
        let req = json_req("POST", "/api/bookings/select-seats", &[("X-User-ID", "viewer@example.com")], body);
        let resp = app.send(req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let session = resp.headers()["x-session-id"].to_str().unwrap().to_string();
        assert!(session.starts_with("user_"));
        assert_eq!(session.len(), "user_".len() + 16);
    }

    #[tokio::test]
    async fn availability_and_missing_slot() {
        let app = app().await;
        let body = json!({"slotId": app.slot.id, "seatNumbers": ["A1", "Z1"]});
        let resp = app
            .send(json_req("POST", "/api/bookings/seats/check-availability", &[], body))
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["seatAvailability"]["A1"], true);
        assert_eq!(json["seatAvailability"]["Z1"], false);

        let body = json!({"slotId": 9999, "seatNumbers": ["A1"]});
        let resp = app
            .send(json_req("POST", "/api/bookings/seats/check-availability", &[], body))
            .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body = json!({"slotId": app.slot.id, "seatNumbers": []});
        let resp = app
            .send(json_req("POST", "/api/bookings/seats/check-availability", &[], body))
            .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn release_requires_session_header() {
        let app = app().await;
        let req = Request::builder()
            .method("DELETE")
            .uri("/api/bookings/release-seats")
            .body(Body::empty())
            .unwrap();
        assert_eq!(app.send(req).await.status(), StatusCode::BAD_REQUEST);

        let req = Request::builder()
            .method("DELETE")
            .uri("/api/bookings/release-seats")
            .header("X-Session-ID", "session_x")
            .body(Body::empty())
            .unwrap();
        let resp = app.send(req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["releasedCount"], 0);
    }

    #[tokio::test]
    async fn payment_requires_authentication() {
        let app = app().await;
        let body = payment_body(app.slot.id, &["A1"], 100.0);
        let resp = app
            .send(json_req("POST", "/api/bookings/payment", &[], body))
            .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn payment_books_then_conflicts() {
        let app = app().await;
        let auth = format!("Bearer {}", app.token("viewer@example.com", "user"));

        let body = payment_body(app.slot.id, &["A1", "A2"], 200.0);
        let resp = app
            .send(json_req("POST", "/api/bookings/payment", &[("Authorization", auth.as_str())], body))
            .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let json = body_json(resp).await;
        assert_eq!(json["status"], "CONFIRMED");
        assert_eq!(json["userEmail"], "viewer@example.com");
        let booking_id = json["id"].as_i64().unwrap();

        let slot = app.repos.slots().find_by_id(app.slot.id).await.unwrap().unwrap();
        assert_eq!(slot.available_seats, 1);

        let body = payment_body(app.slot.id, &["A1"], 100.0);
        let resp = app
            .send(json_req("POST", "/api/bookings/payment", &[("Authorization", auth.as_str())], body))
            .await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        assert_eq!(body_json(resp).await["conflictingSeats"], json!(["A1"]));

        let req = Request::builder()
            .uri("/api/bookings/my-bookings")
            .header("Authorization", &auth)
            .body(Body::empty())
            .unwrap();
        let resp = app.send(req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await.as_array().unwrap().len(), 1);

        let req = Request::builder()
            .method("DELETE")
            .uri(format!("/api/bookings/{}/cancel", booking_id))
            .header("Authorization", &auth)
            .body(Body::empty())
            .unwrap();
        let resp = app.send(req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["status"], "CANCELLED");
    }

    #[tokio::test]
    async fn amount_mismatch_is_400() {
        let app = app().await;
        let auth = format!("Bearer {}", app.token("viewer@example.com", "user"));
        let body = payment_body(app.slot.id, &["A1"], 90.0);
        let resp = app
            .send(json_req("POST", "/api/bookings/payment", &[("Authorization", auth.as_str())], body))
            .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn admin_lists_and_cancels_other_users_bookings() {
        let app = app().await;
        let owner = format!("Bearer {}", app.token("viewer@example.com", "user"));
        let other = format!("Bearer {}", app.token("other@example.com", "user"));
        let admin = format!("Bearer {}", app.token("ops@example.com", "admin"));

        let body = payment_body(app.slot.id, &["A3"], 50.0);
        let resp = app
            .send(json_req("POST", "/api/bookings/payment", &[("Authorization", owner.as_str())], body))
            .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let booking_id = body_json(resp).await["id"].as_i64().unwrap();

        let cancel = |auth: &str, path: String| {
            Request::builder()
                .method("DELETE")
                .uri(path)
                .header("Authorization", auth)
                .body(Body::empty())
                .unwrap()
        };

        let resp = app
            .send(cancel(other.as_str(), format!("/api/bookings/{}/cancel", booking_id)))
            .await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let resp = app
            .send(cancel(other.as_str(), format!("/api/bookings/admin/{}/cancel", booking_id)))
            .await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let req = Request::builder()
            .uri("/api/bookings/admin/all")
            .header("Authorization", &admin)
            .body(Body::empty())
            .unwrap();
        let resp = app.send(req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let all = body_json(resp).await;
        assert_eq!(all.as_array().unwrap().len(), 1);
        assert_eq!(all[0]["userEmail"], "viewer@example.com");

        let resp = app
            .send(cancel(admin.as_str(), format!("/api/bookings/admin/{}/cancel", booking_id)))
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["status"], "CANCELLED");

        let slot = app.repos.slots().find_by_id(app.slot.id).await.unwrap().unwrap();
        assert_eq!(slot.available_seats, 3);
    }

    #[tokio::test]
    async fn admin_routes_reject_plain_users() {
        let app = app().await;
        let user = app.token("viewer@example.com", "user");
        let admin = app.token("ops@example.com", "admin");

        let req = Request::builder()
            .method("POST")
            .uri("/api/admin/cleanup/temporary-locks")
            .header("Authorization", format!("Bearer {}", user))
            .body(Body::empty())
            .unwrap();
        assert_eq!(app.send(req).await.status(), StatusCode::FORBIDDEN);

        let req = Request::builder()
            .method("POST")
            .uri("/api/admin/cleanup/temporary-locks")
            .header("Authorization", format!("Bearer {}", admin))
            .body(Body::empty())
            .unwrap();
        let resp = app.send(req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["deletedCount"], 0);

        let req = Request::builder()
            .uri(format!("/api/bookings/slot/{}", app.slot.id))
            .header("Authorization", format!("Bearer {}", user))
            .body(Body::empty())
            .unwrap();
        assert_eq!(app.send(req).await.status(), StatusCode::FORBIDDEN);

        let req = Request::builder()
            .uri("/api/admin/cleanup/status")
            .header("Authorization", format!("Bearer {}", admin))
            .body(Body::empty())
            .unwrap();
        let resp = app.send(req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["autoCleanupEnabled"], true);
    }
}
