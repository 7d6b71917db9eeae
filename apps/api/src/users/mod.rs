// Users: caller identity, login tracking, and the admin user directory.
pub mod auth;
pub mod directory;
pub mod handlers;
