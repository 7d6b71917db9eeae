// Assessment engine: question bank, generator, scorer, and session plumbing.
pub mod cache;
pub mod generator;
pub mod handlers;
pub mod models;
pub mod question_bank;
pub mod recommendations;
pub mod scorer;
