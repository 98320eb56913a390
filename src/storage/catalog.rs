//! A course catalog loaded from disk
//!
//! The [`Catalog`] reads the course dataset once, applies the configured
//! curriculum-period filter and keeps the resulting [`CourseIndex`] together
//! with the [`Config`] it was built with.

use std::{
    fs::File,
    io::{self, BufReader},
    path::{Path, PathBuf},
};

use tracing::{debug, instrument};

use crate::domain::{
    Config, Course, CourseIndex, DisplayNode, PrerequisiteGraph, TreeBuilder,
};

/// Supported dataset encodings, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// `.json`
    Json,
    /// `.yaml` or `.yml`
    Yaml,
}

impl Format {
    /// Determines the format from a path's extension.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::UnsupportedFormat`] for any other extension.
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let extension = path
            .extension()
            .and_then(|extension| extension.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            _ => Err(LoadError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Errors that can occur when loading a catalog.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The dataset file could not be opened.
    #[error("failed to read catalog {}: {source}", .path.display())]
    Io {
        /// The dataset path.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },
    /// The JSON dataset could not be parsed.
    #[error("failed to parse JSON catalog: {0}")]
    Json(#[from] serde_json::Error),
    /// The YAML dataset could not be parsed.
    #[error("failed to parse YAML catalog: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// The file extension is neither JSON nor YAML.
    #[error("unsupported catalog format: {} (expected .json, .yaml or .yml)", .0.display())]
    UnsupportedFormat(PathBuf),
}

/// Reads the raw course list from a JSON or YAML file.
///
/// # Errors
///
/// Returns an error if the file cannot be opened, has an unsupported
/// extension, or does not contain a sequence of course records.
#[instrument(level = "debug")]
pub fn load_courses(path: &Path) -> Result<Vec<Course>, LoadError> {
    let format = Format::from_path(path)?;
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);

    let courses: Vec<Course> = match format {
        Format::Json => serde_json::from_reader(reader)?,
        Format::Yaml => serde_yaml::from_reader(reader)?,
    };

    debug!(count = courses.len(), "read course records");
    Ok(courses)
}

/// A course catalog indexed according to a configuration.
#[derive(Debug, Clone)]
pub struct Catalog {
    index: CourseIndex,
    config: Config,
    /// Number of records in the dataset before filtering.
    total: usize,
}

impl Catalog {
    /// Loads the dataset at `path` and indexes it using `config`.
    ///
    /// # Errors
    ///
    /// See [`load_courses`].
    pub fn load(path: &Path, config: Config) -> Result<Self, LoadError> {
        let courses = load_courses(path)?;
        Ok(Self::from_courses(courses, config))
    }

    /// Indexes an in-memory course list using `config`.
    #[must_use]
    pub fn from_courses(courses: Vec<Course>, config: Config) -> Self {
        let total = courses.len();
        let index = CourseIndex::build(courses, &config.period_filter());
        Self {
            index,
            config,
            total,
        }
    }

    /// The index of retained courses.
    #[must_use]
    pub const fn index(&self) -> &CourseIndex {
        &self.index
    }

    /// The configuration the catalog was indexed with.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Number of records in the dataset, including filtered-out ones.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.total
    }

    /// A tree builder using the configured language.
    #[must_use]
    pub const fn tree_builder(&self) -> TreeBuilder<'_> {
        TreeBuilder::new(&self.index, self.config.language())
    }

    /// Builds the prerequisite tree for a course code.
    #[must_use]
    pub fn build_tree(&self, code: &str) -> DisplayNode {
        self.tree_builder().build_tree(code)
    }

    /// The prerequisite graph of the retained courses.
    #[must_use]
    pub fn graph(&self) -> PrerequisiteGraph<'_> {
        PrerequisiteGraph::from_index(&self.index)
    }
}
