// Loyalty domain services
pub mod order_service;
pub mod withdraw_service;
pub mod balance_service;
pub mod state;

pub use order_service::*;
pub use withdraw_service::*;
pub use balance_service::*;
pub use state::*;
