// Loyalty domain models
pub mod order;
pub mod balance;
pub mod withdrawal;
pub mod accrual;

pub use order::*;
pub use balance::*;
pub use withdrawal::*;
pub use accrual::*;
