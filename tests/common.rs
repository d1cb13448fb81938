use escapade_backend::{
    api::router::create_router,
    config::Config,
    domain::ports::{CreateSessionParams, EmailService, PaymentService, PaymentSession},
    error::AppError,
    infra::repositories::{
        sqlite_availability_repo::SqliteAvailabilityRepo,
        sqlite_booking_repo::SqliteBookingRepo,
        sqlite_client_repo::SqliteClientRepo,
        sqlite_experience_repo::SqliteExperienceRepo,
        sqlite_order_repo::SqliteOrderRepo,
        sqlite_reservation_repo::SqliteReservationRepo,
    },
    state::AppState,
};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request},
    Router,
};
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tera::Tera;
use tower::ServiceExt;
use uuid::Uuid;

pub struct MockEmailService;

#[async_trait]
impl EmailService for MockEmailService {
    async fn send(&self, _recipient: &str, _subject: &str, _html_body: &str) -> Result<(), AppError> {
        Ok(())
    }
}

/// In-memory checkout sessions. Tests flip a session to paid via
/// [`MockPaymentService::mark_paid`] before hitting the completion endpoints.
pub struct MockPaymentService {
    pub sessions: Mutex<HashMap<String, PaymentSession>>,
}

impl MockPaymentService {
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn mark_paid(&self, session_id: &str) {
        let mut sessions = self.sessions.lock().unwrap();
        let session = sessions.get_mut(session_id).expect("unknown test session");
        session.status = "complete".to_string();
        session.payment_status = "paid".to_string();
        session.payment_intent = Some(format!("pi_{}", Uuid::new_v4().simple()));
    }

    /// Registers a session directly, bypassing the create endpoint. Used to test
    /// decoding of handcrafted metadata.
    pub fn insert_session(&self, session: PaymentSession) {
        self.sessions.lock().unwrap().insert(session.id.clone(), session);
    }

    pub fn payment_intent_of(&self, session_id: &str) -> Option<String> {
        self.sessions.lock().unwrap().get(session_id).and_then(|s| s.payment_intent.clone())
    }
}

#[async_trait]
impl PaymentService for MockPaymentService {
    async fn create_session(&self, params: CreateSessionParams) -> Result<PaymentSession, AppError> {
        let amount_total: i64 = params
            .line_items
            .iter()
            .map(|item| item.unit_amount * i64::from(item.quantity))
            .sum();

        let id = format!("cs_test_{}", Uuid::new_v4().simple());
        let session = PaymentSession {
            id: id.clone(),
            client_secret: Some(format!("{}_secret", id)),
            status: "open".to_string(),
            payment_status: "unpaid".to_string(),
            payment_intent: None,
            currency: params.currency,
            amount_total,
            metadata: params.metadata,
        };

        self.sessions.lock().unwrap().insert(id, session.clone());
        Ok(session)
    }

    async fn retrieve_session(&self, session_id: &str) -> Result<PaymentSession, AppError> {
        self.sessions
            .lock()
            .unwrap()
            .get(session_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("No such checkout session".into()))
    }
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
    pub payment: Arc<MockPaymentService>,
}

impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let mut tera = Tera::default();
        tera.add_raw_template("order_confirmation.html", "<html>Order for {{ customer_name }}</html>").unwrap();
        tera.add_raw_template("booking_confirmation.html", "<html>Booking for {{ customer_name }}</html>").unwrap();
        let templates = Arc::new(tera);

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            payment_secret_key: "sk_test_dummy".to_string(),
            payment_webhook_secret: "whsec_test_secret".to_string(),
            checkout_return_url: "http://localhost/return".to_string(),
            mail_service_url: "http://localhost".to_string(),
            mail_service_token: "token".to_string(),
        };

        let payment = Arc::new(MockPaymentService::new());

        let state = Arc::new(AppState {
            config,
            experience_repo: Arc::new(SqliteExperienceRepo::new(pool.clone())),
            availability_repo: Arc::new(SqliteAvailabilityRepo::new(pool.clone())),
            reservation_repo: Arc::new(SqliteReservationRepo::new(pool.clone())),
            booking_repo: Arc::new(SqliteBookingRepo::new(pool.clone())),
            order_repo: Arc::new(SqliteOrderRepo::new(pool.clone())),
            client_repo: Arc::new(SqliteClientRepo::new(pool.clone())),
            payment_service: payment.clone(),
            email_service: Arc::new(MockEmailService),
            templates,
        });

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
            payment,
        }
    }

    pub async fn post_json(&self, uri: &str, payload: &Value) -> axum::response::Response {
        self.router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    pub async fn get(&self, uri: &str) -> axum::response::Response {
        self.router
            .clone()
            .oneshot(Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    pub async fn create_experience(&self, slug: &str, duration_hours: Option<f64>) -> String {
        let payload = serde_json::json!({
            "slug": slug,
            "title": format!("Experience {}", slug),
            "description": "A test experience",
            "category": "romantic",
            "duration_hours": duration_hours,
            "price": 240.0,
            "status": "available"
        });
        let response = self.post_json("/api/v1/experiences", &payload).await;
        assert!(response.status().is_success(), "failed to create experience");
        let body = parse_body(response).await;
        body["id"].as_str().unwrap().to_string()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}

pub async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
