pub mod auth;
pub mod digest;
pub mod engagement;
pub mod health;
pub mod location;
pub mod members;
