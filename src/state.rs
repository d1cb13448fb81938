use std::sync::Arc;
use crate::domain::ports::{
    AvailabilityRepository, BookingRepository, ClientRepository, EmailService,
    ExperienceRepository, OrderRepository, PaymentService, ReservationRepository,
};
use crate::config::Config;
use tera::Tera;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub experience_repo: Arc<dyn ExperienceRepository>,
    pub availability_repo: Arc<dyn AvailabilityRepository>,
    pub reservation_repo: Arc<dyn ReservationRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub order_repo: Arc<dyn OrderRepository>,
    pub client_repo: Arc<dyn ClientRepository>,
    pub payment_service: Arc<dyn PaymentService>,
    pub email_service: Arc<dyn EmailService>,
    pub templates: Arc<Tera>,
}
