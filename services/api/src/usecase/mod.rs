pub mod application;
pub mod auth;
pub mod contact;
pub mod pet;
pub mod upload;
pub mod user;
