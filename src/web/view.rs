//! HTML views.

use chrono::{DateTime, Utc};
use handlebars::Handlebars;
use serde::Serialize;

use crate::file::StoredFile;
use crate::{NodekbError, Result};

const INDEX_TEMPLATE: &str = include_str!("../../templates/index.hbs");

/// Title of the file listing page.
pub const ADD_TITLE: &str = "Add File";

/// Title of the home page.
pub const HOME_TITLE: &str = "Articles";

/// A stored file as the list view sees it.
#[derive(Debug, Clone, Serialize)]
pub struct FileView {
    /// Store identifier, used by the delete form.
    pub id: String,
    /// Stored filename.
    pub filename: String,
    /// Content type, if any.
    #[serde(rename = "contentType")]
    pub content_type: Option<String>,
    /// Size in bytes.
    pub length: i64,
    /// Upload time.
    #[serde(rename = "uploadDate")]
    pub upload_date: DateTime<Utc>,
    /// True iff the content type is `image/jpeg` or `image/png`.
    #[serde(rename = "isImage")]
    pub is_image: bool,
}

impl From<StoredFile> for FileView {
    fn from(file: StoredFile) -> Self {
        let is_image = file.is_image();
        Self {
            id: file.id,
            filename: file.filename,
            content_type: file.content_type,
            length: file.length,
            upload_date: file.upload_date,
            is_image,
        }
    }
}

/// The `files` value of the list view: `false` when nothing is stored.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum FileListing {
    /// No files; rendered as `false`.
    Empty(bool),
    /// Annotated files.
    Files(Vec<FileView>),
}

impl FileListing {
    /// Build a listing, annotating each file with `isImage`.
    pub fn from_files(files: Vec<StoredFile>) -> Self {
        if files.is_empty() {
            FileListing::Empty(false)
        } else {
            FileListing::Files(files.into_iter().map(FileView::from).collect())
        }
    }
}

/// Data passed to the index template.
#[derive(Debug, Serialize)]
pub struct IndexPage<'a> {
    /// Page title.
    pub title: &'a str,
    /// Files to show.
    pub files: FileListing,
}

/// Renders the application's HTML pages.
pub struct ViewRenderer {
    registry: Handlebars<'static>,
}

impl ViewRenderer {
    /// Create a renderer with the built-in templates registered.
    pub fn new() -> Result<Self> {
        let mut registry = Handlebars::new();
        registry
            .register_template_string("index", INDEX_TEMPLATE)
            .map_err(|e| NodekbError::Template(e.to_string()))?;

        Ok(Self { registry })
    }

    /// Render the index page.
    pub fn render_index(&self, page: &IndexPage<'_>) -> Result<String> {
        self.registry
            .render("index", page)
            .map_err(|e| NodekbError::Template(e.to_string()))
    }
}

impl std::fmt::Debug for ViewRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewRenderer").finish()
    }
}
