//! Payment gateway implementations

pub mod mock;

pub use mock::MockPaymentGateway;
