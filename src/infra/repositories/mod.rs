pub mod postgres_availability_repo;
pub mod postgres_booking_repo;
pub mod postgres_client_repo;
pub mod postgres_experience_repo;
pub mod postgres_order_repo;
pub mod postgres_reservation_repo;
pub mod sqlite_availability_repo;
pub mod sqlite_booking_repo;
pub mod sqlite_client_repo;
pub mod sqlite_experience_repo;
pub mod sqlite_order_repo;
pub mod sqlite_reservation_repo;
