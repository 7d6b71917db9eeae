// Hackathon listings: schedule-derived status, creation, and joining.
pub mod handlers;
pub mod schedule;
