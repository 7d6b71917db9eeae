// Admin analytics: dashboard metrics and the admin read endpoints.
pub mod handlers;
pub mod metrics;
