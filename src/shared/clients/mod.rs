// External API clients
pub mod retry;
pub mod accrual;

pub use retry::*;
pub use accrual::*;
