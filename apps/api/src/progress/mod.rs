// Learning progress: workflow steps, weak skills from history, completed videos.
pub mod handlers;
pub mod workflow;
