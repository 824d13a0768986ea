// Loyalty domain module
// 포인트 적립/차감 도메인
pub mod models;
pub mod ledger;
pub mod queue;
pub mod services;
pub mod handlers;
pub mod routes;

pub use models::*;
