use std::path::{Path as FsPath, PathBuf};

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio_util::io::ReaderStream;
use tracing::{debug, warn};

use crate::error::PeriscopeError;
use crate::listing::{list_directories, list_files, DirectoryEntry, FileEntry};
use crate::navigation::{breadcrumbs, paginate, parent_path, parent_url};
use crate::resolver::{relative_url_path, resolve_as, Expect};
use crate::sanitize::sanitize_html;
use crate::search::search;
use crate::tree::{build_tree, DirectoryTreeNode};
use crate::views::{browse_page, document_page, BrowseView};
use crate::AppState;

/// Query parameters for listing pages
#[derive(Debug, Deserialize, Default)]
pub struct BrowseQuery {
    /// 1-based page number (defaults to 1)
    pub page: Option<usize>,
    /// Items per page (defaults to config value)
    pub per_page: Option<usize>,
    /// Grid columns, display only (defaults to config value)
    pub col_count: Option<usize>,
    /// Recursive file name search
    pub q: Option<String>,
}

impl BrowseQuery {
    fn search_query(&self) -> Option<&str> {
        self.q.as_deref().filter(|q| !q.is_empty())
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: String,
    pub commit_hash: String,
    pub root: String,
}

/// Filesystem results gathered off the async runtime
struct Listing {
    directories: Vec<DirectoryEntry>,
    items: Vec<FileEntry>,
    tree: DirectoryTreeNode,
}

// ============================================================================
// Helper functions
// ============================================================================

/// Decode document bytes as UTF-8, falling back to Latin-1.
fn decode_text(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            debug!("Document is not UTF-8, decoding as Latin-1");
            e.into_bytes().into_iter().map(char::from).collect()
        }
    }
}

fn file_name_of(path: &FsPath) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn ensure_root(state: &AppState) -> Result<PathBuf, PeriscopeError> {
    let root = state.root_dir();
    if !root.is_dir() {
        warn!("Root directory unavailable: {}", root.display());
        return Err(PeriscopeError::RootUnavailable);
    }
    Ok(root.to_path_buf())
}

/// Resolve a directory, gather its listing and render the browse page.
async fn render_listing(
    state: AppState,
    requested: &str,
    query: BrowseQuery,
) -> Result<Html<String>, PeriscopeError> {
    let root = ensure_root(&state)?;
    let target = resolve_as(&root, requested, Expect::Directory)?;
    let current_path = relative_url_path(&root, &target);
    let search_query = query.search_query().map(str::to_string);

    debug!(
        "Listing {} (search: {:?})",
        target.display(),
        search_query
    );

    let listing = {
        let state = state.clone();
        let base = current_path.clone();
        let search_query = search_query.clone();

        tokio::task::spawn_blocking(move || {
            let config = state.config();
            let directories = list_directories(&root, &target, &base);
            let items = match &search_query {
                Some(q) => search(config, &target, q, &root),
                None => list_files(config, &root, &target, &base),
            };
            let tree = build_tree(&root, &config.root_label);
            Listing {
                directories,
                items,
                tree,
            }
        })
        .await
        .map_err(|err| PeriscopeError::Task(err.to_string()))?
    };

    let config = state.config();
    let per_page = query.per_page.unwrap_or(config.default_per_page);
    let col_count = query.col_count.unwrap_or(config.default_col_count);
    let items = paginate(listing.items, query.page.unwrap_or(1), per_page);

    let view = BrowseView {
        current_path: &current_path,
        parent_path: parent_path(&current_path),
        breadcrumbs: breadcrumbs(&current_path),
        directories: listing.directories,
        items,
        col_count,
        search_query: search_query.as_deref(),
        tree: listing.tree,
        root_label: &config.root_label,
        image_directory: state.root_dir().display().to_string(),
        build: state.build(),
    };

    Ok(Html(browse_page(&view).into_string()))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /health - Health check endpoint
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let build = state.build();
    Json(HealthResponse {
        status: "ok",
        version: build.version.clone(),
        commit_hash: build.commit_hash.clone(),
        root: state.root_dir().display().to_string(),
    })
}

/// GET / and GET /browse/ - List the root directory
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<BrowseQuery>,
) -> Result<Html<String>, PeriscopeError> {
    render_listing(state, "", query).await
}

/// GET /browse/*path - List a directory below the root
pub async fn browse(
    State(state): State<AppState>,
    Path(path): Path<String>,
    Query(query): Query<BrowseQuery>,
) -> Result<Html<String>, PeriscopeError> {
    render_listing(state, path.trim_end_matches('/'), query).await
}

/// GET /images/*path - Stream a file from the root
pub async fn serve_image(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Response, PeriscopeError> {
    let root = ensure_root(&state)?;
    let path = resolve_as(&root, &path, Expect::File)?;

    debug!("Streaming file: {}", path.display());

    let metadata = fs::metadata(&path).await?;
    let file = fs::File::open(&path).await?;
    let body = Body::from_stream(ReaderStream::new(file));

    let mime = mime_guess::from_path(&path)
        .first_or_octet_stream()
        .to_string();

    let safe_filename = file_name_of(&path).replace('"', "'");

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, mime),
            (header::CONTENT_LENGTH, metadata.len().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{}\"", safe_filename),
            ),
        ],
        body,
    )
        .into_response())
}

/// GET /view/*path - Show a sanitized HTML document inline
pub async fn view_html(
    State(state): State<AppState>,
    Path(requested): Path<String>,
) -> Result<Html<String>, PeriscopeError> {
    let root = ensure_root(&state)?;
    let path = resolve_as(&root, &requested, Expect::File)?;

    let is_html = path
        .extension()
        .map(|ext| state.config().is_html_extension(&format!(".{}", ext.to_string_lossy())))
        .unwrap_or(false);
    if !is_html {
        return Err(PeriscopeError::NotHtml(requested));
    }

    debug!("Viewing document: {}", path.display());

    let content = decode_text(fs::read(&path).await?);
    let safe_content = sanitize_html(&content);

    let back_url = parent_url(
        &path
            .parent()
            .map(|dir| relative_url_path(&root, dir))
            .unwrap_or_default(),
    );

    Ok(Html(
        document_page(&file_name_of(&path), &back_url, &safe_content).into_string(),
    ))
}
