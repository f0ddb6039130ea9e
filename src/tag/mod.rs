//! Comment-tag extraction
//!
//! Tags are HTML comments of the form `<!-- NAME key='value' ... -->`, or a
//! `<!-- NAME_START ... -->` / `<!-- NAME_END -->` pair enclosing content.

mod extract;
mod types;

pub use extract::extract_tags;
pub use types::{Tag, TagSpan};
