pub mod availability;
pub mod checkout;
pub mod chunking;
pub mod fulfillment;
