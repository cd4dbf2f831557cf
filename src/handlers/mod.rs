pub mod auth;
pub mod orders;
pub mod resources;
pub mod stores;
