pub mod availability;
pub mod backoffice;
pub mod checkout;
pub mod experience;
pub mod health;
pub mod webhook;
