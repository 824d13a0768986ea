// Loyalty domain handlers
pub mod order_handler;
pub mod balance_handler;

pub use order_handler::*;
pub use balance_handler::*;
