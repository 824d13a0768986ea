// Shared errors
pub mod auth_error;
pub mod accrual_error;
pub mod config_error;
pub mod loyalty_error;

pub use auth_error::*;
pub use accrual_error::*;
pub use config_error::*;
pub use loyalty_error::*;
