//! Template system for reusable HTML fragments
//!
//! Templates are declared in `.template` files and spliced into pages at
//! injection points. Extra properties on an injection tag become named
//! values for the whole page.
//!
//! # Example
//!
//! ```text
//! <!-- header.template -->
//! <!-- TEMPLATE_START id='header' -->
//! <header><h1>{{{title}}}</h1></header>
//! <!-- TEMPLATE_END -->
//!
//! <!-- index.html -->
//! <!-- INJECT_TEMPLATE templateId='header' title='Home' -->
//! ```

mod injector;
mod registry;

pub use injector::{inject_templates, INJECT_TEMPLATE_ID_PROPERTY, INJECT_TEMPLATE_TAG};
pub use registry::{Template, TemplateError, TemplateRegistry, TEMPLATE_ID_PROPERTY, TEMPLATE_TAG};
