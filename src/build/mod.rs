//! Build orchestration - mirrors a source tree into an output tree
//!
//! Template files are loaded first; then every page is spliced, has its
//! values resolved and is written to the matching output folder. Other files
//! are copied unchanged. Template files themselves are never copied.

mod handler;

use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use thiserror::Error;

use crate::config::InjectorConfig;
use crate::error::InjectError;
use crate::fs::{file_name, FileSystem};
use crate::template::{inject_templates, TemplateError, TemplateRegistry};
use crate::values::{resolve_values, ValueMap};

pub use handler::{BuildHandler, CollectingHandler, LogHandler};

/// Message reported to the handler after any failure
pub const BUILD_FAILED_MESSAGE: &str = "Processing failed :(";

/// Errors that abort a build
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("source folder doesn't seem to exist: {}", path.display())]
    SourceMissing { path: PathBuf },

    /// Building into the source tree would delete or re-read the output
    #[error("output folder {} must not be inside source folder {}", output.display(), source_folder.display())]
    OutputInsideSource {
        source_folder: PathBuf,
        output: PathBuf,
    },

    /// Clearing the output folder would delete the source tree
    #[error("source folder {} must not be inside output folder {}", source_folder.display(), output.display())]
    SourceInsideOutput {
        source_folder: PathBuf,
        output: PathBuf,
    },

    #[error("error accessing {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("error processing {}: {source}", path.display())]
    Page { path: PathBuf, source: InjectError },
}

/// What a successful build did
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BuildSummary {
    pub templates: usize,
    pub pages: usize,
    pub copied: usize,
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> BuildError {
    let path = path.to_path_buf();
    move |source| BuildError::Io { path, source }
}

/// Run one page through template injection and value resolution
///
/// The value map lives only for this page.
pub fn render_page(
    raw: &str,
    templates: &TemplateRegistry,
    config: &InjectorConfig,
) -> Result<String, InjectError> {
    let mut values = ValueMap::new();
    let spliced = inject_templates(raw, templates, &mut values, config)?;
    resolve_values(&spliced, &values)
}

/// Build `source` into `output`
///
/// Any existing `output` folder is deleted first. On failure the handler
/// gets the error message followed by [`BUILD_FAILED_MESSAGE`]; files written
/// before the failure stay in place.
pub fn build_tree<F: FileSystem + ?Sized>(
    fs: &mut F,
    source: &Path,
    output: &Path,
    config: &InjectorConfig,
    handler: &mut dyn BuildHandler,
) -> Result<BuildSummary, BuildError> {
    match run(fs, source, output, config, handler) {
        Ok(summary) => {
            handler.on_event(&format!(
                "Processed {} page(s), copied {} file(s) using {} template(s)",
                summary.pages, summary.copied, summary.templates
            ));
            Ok(summary)
        }
        Err(e) => {
            handler.on_error(&e.to_string());
            handler.on_event(BUILD_FAILED_MESSAGE);
            Err(e)
        }
    }
}

fn run<F: FileSystem + ?Sized>(
    fs: &mut F,
    source: &Path,
    output: &Path,
    config: &InjectorConfig,
    handler: &mut dyn BuildHandler,
) -> Result<BuildSummary, BuildError> {
    if !fs.exists(source) {
        return Err(BuildError::SourceMissing {
            path: source.to_path_buf(),
        });
    }
    let source_location = fs.absolute(source).map_err(io_error(source))?;
    let output_location = fs.absolute(output).map_err(io_error(output))?;
    if output_location.starts_with(&source_location) {
        return Err(BuildError::OutputInsideSource {
            source_folder: source.to_path_buf(),
            output: output.to_path_buf(),
        });
    }
    if source_location.starts_with(&output_location) {
        return Err(BuildError::SourceInsideOutput {
            source_folder: source.to_path_buf(),
            output: output.to_path_buf(),
        });
    }

    if fs.exists(output) {
        debug!("removing existing output folder {}", output.display());
        fs.delete_folder_recursive(output).map_err(io_error(output))?;
    }
    fs.create_folder(output).map_err(io_error(output))?;

    let mut templates = TemplateRegistry::new();
    let mut summary = BuildSummary {
        templates: templates.load_folder(&*fs, source, config, handler)?,
        ..BuildSummary::default()
    };

    let mut builder = TreeBuilder {
        fs,
        templates: &templates,
        config,
        handler,
        summary: &mut summary,
    };
    builder.build_folder(source, output)?;

    Ok(summary)
}

struct TreeBuilder<'a, F: FileSystem + ?Sized> {
    fs: &'a mut F,
    templates: &'a TemplateRegistry,
    config: &'a InjectorConfig,
    handler: &'a mut dyn BuildHandler,
    summary: &'a mut BuildSummary,
}

impl<F: FileSystem + ?Sized> TreeBuilder<'_, F> {
    fn build_folder(&mut self, source: &Path, output: &Path) -> Result<(), BuildError> {
        for child in self.fs.list_child_folders(source).map_err(io_error(source))? {
            let name = file_name(&child).map_err(io_error(&child))?;
            let child_output = output.join(name);
            if !self.fs.exists(&child_output) {
                self.fs
                    .create_folder(&child_output)
                    .map_err(io_error(&child_output))?;
            }
            self.build_folder(&child, &child_output)?;
        }

        for file in self.fs.list_files(source).map_err(io_error(source))? {
            let name = file_name(&file).map_err(io_error(&file))?;
            if self.config.is_page_file(name) {
                self.process_page(&file, &output.join(name))?;
            } else if !self.config.is_template_file(name) {
                debug!("copying {}", file.display());
                self.fs.copy_file(&file, output).map_err(io_error(&file))?;
                self.summary.copied += 1;
            }
        }

        Ok(())
    }

    fn process_page(&mut self, file: &Path, destination: &Path) -> Result<(), BuildError> {
        self.handler
            .on_event(&format!("Processing HTML file {}", file.display()));

        let raw = self.fs.read_file_text(file).map_err(io_error(file))?;
        let html = render_page(&raw, self.templates, self.config).map_err(|source| {
            BuildError::Page {
                path: file.to_path_buf(),
                source,
            }
        })?;

        self.fs
            .create_file(destination, &html)
            .map_err(io_error(destination))?;
        self.summary.pages += 1;
        Ok(())
    }
}
