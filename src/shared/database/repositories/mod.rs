// All repositories module
pub mod auth;
pub mod loyalty;

// Re-export all repositories for convenience
pub use auth::*;
pub use loyalty::*;
