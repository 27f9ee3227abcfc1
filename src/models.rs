pub mod auth;
pub mod catalog;
pub mod doctor;
pub mod finance;
pub mod lead;
pub mod payout;
