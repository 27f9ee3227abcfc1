pub mod auth;
pub mod catalog;
pub mod doctors;
pub mod financials;
pub mod leads;
pub mod payouts;
