use crate::domain::models::{
    availability::{RecurringRule, RuleTimeSlot, SpecificAvailability},
    booking::Booking,
    client::Client,
    experience::Experience,
    order::Order,
    reservation::{OccupancyRow, Reservation},
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;

#[async_trait]
pub trait ExperienceRepository: Send + Sync {
    async fn create(&self, experience: &Experience) -> Result<Experience, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Experience>, AppError>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Experience>, AppError>;
    async fn list(&self) -> Result<Vec<Experience>, AppError>;
    async fn update(&self, experience: &Experience) -> Result<Experience, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait AvailabilityRepository: Send + Sync {
    async fn create_rule(&self, rule: &RecurringRule, slots: &[RuleTimeSlot]) -> Result<RecurringRule, AppError>;
    async fn list_rules(&self, experience_id: &str) -> Result<Vec<(RecurringRule, Vec<RuleTimeSlot>)>, AppError>;
    async fn delete_rule(&self, experience_id: &str, rule_id: &str) -> Result<(), AppError>;
    async fn upsert_specific(&self, entry: &SpecificAvailability) -> Result<SpecificAvailability, AppError>;
    async fn list_specific(&self, experience_id: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<SpecificAvailability>, AppError>;
    async fn delete_specific(&self, experience_id: &str, date: NaiveDate) -> Result<(), AppError>;
}

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    async fn create(&self, reservation: &Reservation) -> Result<Reservation, AppError>;
    /// Non-cancelled occupancy across both the legacy reservations table and the
    /// bookings table, for every experience in the date range.
    async fn list_occupancy(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<OccupancyRow>, AppError>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn create(&self, booking: &Booking) -> Result<Booking, AppError>;
    async fn list(&self) -> Result<Vec<Booking>, AppError>;
    async fn list_by_session(&self, session_id: &str) -> Result<Vec<Booking>, AppError>;
    async fn mark_payment_failed(&self, payment_intent_id: &str) -> Result<u64, AppError>;
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn create(&self, order: &Order) -> Result<Order, AppError>;
    async fn list(&self) -> Result<Vec<Order>, AppError>;
    async fn find_by_session(&self, session_id: &str) -> Result<Option<Order>, AppError>;
    async fn next_sequence(&self) -> Result<i64, AppError>;
    async fn mark_payment_failed(&self, payment_intent_id: &str) -> Result<u64, AppError>;
}

#[async_trait]
pub trait ClientRepository: Send + Sync {
    async fn create(&self, client: &Client) -> Result<Client, AppError>;
    async fn update(&self, client: &Client) -> Result<Client, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Client>, AppError>;
    async fn list(&self) -> Result<Vec<Client>, AppError>;
}

#[derive(Debug, Clone)]
pub struct SessionLineItem {
    pub name: String,
    pub unit_amount: i64,
    pub quantity: u32,
}

#[derive(Debug, Clone)]
pub struct CreateSessionParams {
    pub line_items: Vec<SessionLineItem>,
    pub metadata: HashMap<String, String>,
    pub customer_email: String,
    pub currency: String,
}

/// Provider-held checkout session, reduced to the fields the core flow reads.
#[derive(Debug, Clone)]
pub struct PaymentSession {
    pub id: String,
    pub client_secret: Option<String>,
    pub status: String,
    pub payment_status: String,
    pub payment_intent: Option<String>,
    pub currency: String,
    pub amount_total: i64,
    pub metadata: HashMap<String, String>,
}

#[async_trait]
pub trait PaymentService: Send + Sync {
    async fn create_session(&self, params: CreateSessionParams) -> Result<PaymentSession, AppError>;
    async fn retrieve_session(&self, session_id: &str) -> Result<PaymentSession, AppError>;
}

#[async_trait]
pub trait EmailService: Send + Sync {
    async fn send(&self, recipient: &str, subject: &str, html_body: &str) -> Result<(), AppError>;
}
