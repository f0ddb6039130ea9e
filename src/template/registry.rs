//! Template registry for storing and loading template definitions

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use thiserror::Error;

use crate::build::BuildHandler;
use crate::config::InjectorConfig;
use crate::error::InjectError;
use crate::fs::{file_name, FileSystem};
use crate::tag::extract_tags;

pub const TEMPLATE_TAG: &str = "TEMPLATE";
pub const TEMPLATE_ID_PROPERTY: &str = "id";

/// Errors that can occur while building the registry
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Two templates share an id
    #[error("duplicate template id {id}")]
    Duplicate {
        id: String,
        first: Option<PathBuf>,
        second: Option<PathBuf>,
    },

    /// A template file declares no template
    #[error("missing TEMPLATE tag in {}", path.display())]
    MissingTemplateTag { path: PathBuf },

    /// Broken markup in a template file
    #[error("invalid template file {}: {source}", path.display())]
    Malformed { path: PathBuf, source: InjectError },

    /// Error listing or reading template sources
    #[error("error reading {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
}

/// A named fragment captured between `TEMPLATE_START` and `TEMPLATE_END`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub id: String,
    /// Raw body; may contain further injection and value tags
    pub text: String,
    /// File the template was loaded from
    pub source: Option<PathBuf>,
}

impl Template {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            source: None,
        }
    }
}

/// Registry of templates keyed by id
///
/// Filled once before any page is processed and only read afterwards.
#[derive(Debug, Default, Clone)]
pub struct TemplateRegistry {
    templates: HashMap<String, Template>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template; ids must be unique
    pub fn register(&mut self, template: Template) -> Result<(), TemplateError> {
        if let Some(existing) = self.templates.get(&template.id) {
            return Err(TemplateError::Duplicate {
                id: template.id.clone(),
                first: existing.source.clone(),
                second: template.source,
            });
        }
        self.templates.insert(template.id.clone(), template);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Template> {
        self.templates.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.templates.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Register every `TEMPLATE` tag found in the text of one template file
    ///
    /// Returns the number of templates registered.
    pub fn load_str(&mut self, text: &str, path: &Path) -> Result<usize, TemplateError> {
        let malformed = |source| TemplateError::Malformed {
            path: path.to_path_buf(),
            source,
        };

        let tags = extract_tags(text, TEMPLATE_TAG, true).map_err(malformed)?;
        if tags.is_empty() {
            return Err(TemplateError::MissingTemplateTag {
                path: path.to_path_buf(),
            });
        }

        let count = tags.len();
        for tag in tags {
            let id = tag.property(TEMPLATE_ID_PROPERTY).ok_or_else(|| {
                malformed(InjectError::missing_property(
                    TEMPLATE_TAG,
                    TEMPLATE_ID_PROPERTY,
                    tag.start_span().range(),
                ))
            })?;
            debug!("registering template {} from {}", id, path.display());
            self.register(Template {
                id: id.to_string(),
                text: tag.content().unwrap_or_default().to_string(),
                source: Some(path.to_path_buf()),
            })?;
        }

        Ok(count)
    }

    /// Load every template file under `folder`, child folders first
    ///
    /// Returns the number of templates registered.
    pub fn load_folder<F: FileSystem + ?Sized>(
        &mut self,
        fs: &F,
        folder: &Path,
        config: &InjectorConfig,
        handler: &mut dyn BuildHandler,
    ) -> Result<usize, TemplateError> {
        let io_error = |path: &Path| {
            let path = path.to_path_buf();
            move |source| TemplateError::Io { path, source }
        };

        let mut count = 0;

        for child in fs.list_child_folders(folder).map_err(io_error(folder))? {
            count += self.load_folder(fs, &child, config, handler)?;
        }

        for file in fs.list_files(folder).map_err(io_error(folder))? {
            let name = file_name(&file).map_err(io_error(&file))?;
            if !config.is_template_file(name) {
                continue;
            }
            handler.on_event(&format!("Loading template {}", file.display()));
            let text = fs.read_file_text(&file).map_err(io_error(&file))?;
            count += self.load_str(&text, &file)?;
        }

        Ok(count)
    }
}
