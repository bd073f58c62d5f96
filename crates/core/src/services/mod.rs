pub mod portfolio_service;
pub mod rate_service;
