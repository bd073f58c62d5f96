pub mod currency;
pub mod portfolio;
pub mod rate;
pub mod user;
pub mod wallet;
