pub mod availability;
pub mod booking;
pub mod cart;
pub mod client;
pub mod experience;
pub mod order;
pub mod reservation;
