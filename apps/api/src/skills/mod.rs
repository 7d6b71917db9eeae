// Resume skill extraction.
// Document decoding lives here too; the extractor itself only ever sees text.

pub mod catalog;
pub mod document;
pub mod extractor;
pub mod handlers;
