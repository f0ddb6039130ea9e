//! HTML Injector - build-time templating for trees of static HTML
//!
//! Templates are declared in `.template` files with comment tags and spliced
//! into `.html` pages at injection points. Extra properties on an injection
//! tag become named values that fill `{{{name}}}` placeholders and
//! `INJECT_TEMPLATE_VALUE` tags anywhere on the page.
//!
//! # Example
//!
//! ```rust
//! use html_injector::{render_page, InjectorConfig, Template, TemplateRegistry};
//!
//! let mut templates = TemplateRegistry::new();
//! templates
//!     .register(Template::new("greeting", "<p>Hello, {{{name}}}!</p>"))
//!     .unwrap();
//!
//! let html = render_page(
//!     "<body><!-- INJECT_TEMPLATE templateId='greeting' name='World' --></body>",
//!     &templates,
//!     &InjectorConfig::default(),
//! )
//! .unwrap();
//! assert_eq!(html, "<body><p>Hello, World!</p></body>");
//! ```

pub mod build;
pub mod config;
pub mod error;
pub mod fs;
pub mod tag;
pub mod template;
pub mod values;

use std::path::Path;

pub use build::{
    build_tree, render_page, BuildError, BuildHandler, BuildSummary, CollectingHandler,
    LogHandler,
};
pub use config::{ConfigError, InjectorConfig};
pub use error::{ErrorKind, InjectError, Span};
pub use fs::{FileSystem, LocalFileSystem, MemoryFileSystem};
pub use tag::{extract_tags, Tag, TagSpan};
pub use template::{inject_templates, Template, TemplateError, TemplateRegistry};
pub use values::{resolve_values, ValueMap};

/// Build `source` into `output` on disk with the default configuration
///
/// Progress goes to the `log` facade. `output` is deleted first if it exists.
pub fn build(source: &Path, output: &Path) -> Result<BuildSummary, BuildError> {
    build_with_config(source, output, &InjectorConfig::default())
}

/// Build `source` into `output` on disk with a custom configuration
///
/// # Example
///
/// ```rust,no_run
/// use std::path::Path;
/// use html_injector::{build_with_config, InjectorConfig};
///
/// let config = InjectorConfig::new().with_max_depth(8);
/// let summary = build_with_config(Path::new("site"), Path::new("public"), &config).unwrap();
/// println!("{} pages", summary.pages);
/// ```
pub fn build_with_config(
    source: &Path,
    output: &Path,
    config: &InjectorConfig,
) -> Result<BuildSummary, BuildError> {
    build_tree(
        &mut LocalFileSystem::new(),
        source,
        output,
        config,
        &mut LogHandler::new(),
    )
}
