pub mod auth;
pub mod reports;
pub mod submissions;
pub mod tags;
