//! Server-rendered pages.

use maud::{html, Markup, PreEscaped, DOCTYPE};

use crate::listing::{url_for, DirectoryEntry, FileEntry, FileKind};
use crate::navigation::{parent_url, Breadcrumb, Page};
use crate::tree::DirectoryTreeNode;
use crate::BuildInfo;

const STYLES: &str = "
body { font-family: sans-serif; margin: 0; display: flex; }
nav.sidebar { width: 260px; padding: 1em; border-right: 1px solid #ddd; min-height: 100vh; }
nav.sidebar ul { list-style: none; padding-left: 1em; margin: 0; }
main { flex: 1; padding: 1em; }
.breadcrumbs a { margin-right: 0.25em; }
.directories { display: flex; flex-wrap: wrap; gap: 0.5em; padding: 0; list-style: none; }
.grid { display: grid; gap: 1em; }
.grid figure { margin: 0; }
.grid img { max-width: 100%; }
.pagination a, .pagination span { margin: 0 0.25em; }
footer { margin-top: 2em; color: #666; font-size: 0.85em; }
";

/// Everything the browse page shows
pub struct BrowseView<'a> {
    pub current_path: &'a str,
    pub parent_path: Option<String>,
    pub breadcrumbs: Vec<Breadcrumb>,
    pub directories: Vec<DirectoryEntry>,
    pub items: Page<FileEntry>,
    pub col_count: usize,
    pub search_query: Option<&'a str>,
    pub tree: DirectoryTreeNode,
    pub root_label: &'a str,
    pub image_directory: String,
    pub build: &'a BuildInfo,
}

impl BrowseView<'_> {
    fn base_url(&self) -> String {
        if self.current_path.is_empty() {
            "/".to_string()
        } else {
            url_for("/browse", self.current_path)
        }
    }

    fn page_url(&self, page: usize) -> String {
        let mut url = format!(
            "{}?page={}&per_page={}&col_count={}",
            self.base_url(),
            page,
            self.items.per_page,
            self.col_count
        );
        if let Some(q) = self.search_query {
            url.push_str("&q=");
            url.push_str(&urlencoding::encode(q));
        }
        url
    }
}

fn layout(title: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(STYLES)) }
            }
            body { (body) }
        }
    }
}

fn tree_node(node: &DirectoryTreeNode) -> Markup {
    html! {
        li {
            a href=(node.url) { (node.name) }
            @if !node.children.is_empty() {
                ul {
                    @for child in &node.children {
                        (tree_node(child))
                    }
                }
            }
        }
    }
}

fn file_item(item: &FileEntry) -> Markup {
    html! {
        figure {
            @match item.kind {
                FileKind::Image => {
                    a href=(item.url) target="_blank" {
                        img src=(item.url) alt=(item.name) loading="lazy";
                    }
                }
                FileKind::Html => {
                    a.document href=(item.url) { "📄 " (item.name) }
                }
            }
            figcaption { (item.name) }
        }
    }
}

fn pagination(view: &BrowseView) -> Markup {
    let page = view.items.page;
    let total_pages = view.items.total_pages;
    html! {
        @if total_pages > 1 {
            div.pagination {
                @if page > 1 {
                    a href=(view.page_url(page - 1)) { "« Prev" }
                }
                @for p in 1..=total_pages {
                    @if p == page {
                        span.current { (p) }
                    } @else {
                        a href=(view.page_url(p)) { (p) }
                    }
                }
                @if page < total_pages {
                    a href=(view.page_url(page + 1)) { "Next »" }
                }
            }
        }
    }
}

/// Directory listing with sidebar tree, breadcrumbs, search and pagination.
pub fn browse_page(view: &BrowseView) -> Markup {
    let title = if view.current_path.is_empty() {
        view.root_label.to_string()
    } else {
        view.current_path.to_string()
    };

    layout(
        &title,
        html! {
            nav.sidebar {
                ul.tree { (tree_node(&view.tree)) }
            }
            main {
                div.breadcrumbs {
                    a href="/" { (view.root_label) }
                    @for crumb in &view.breadcrumbs {
                        " / "
                        a href=(crumb.url) { (crumb.name) }
                    }
                }
                @if let Some(parent) = &view.parent_path {
                    p.parent { a href=(parent_url(parent)) { "⬆ Up" } }
                }
                form.search method="get" action=(view.base_url()) {
                    input type="search" name="q" value=(view.search_query.unwrap_or("")) placeholder="Search files";
                    input type="hidden" name="per_page" value=(view.items.per_page);
                    input type="hidden" name="col_count" value=(view.col_count);
                    button type="submit" { "Search" }
                }
                @if !view.directories.is_empty() {
                    ul.directories {
                        @for dir in &view.directories {
                            li { a href=(dir.url) { "📁 " (dir.name) } }
                        }
                    }
                }
                @if view.items.items.is_empty() {
                    p.empty {
                        @if view.search_query.is_some() { "No matching files." } @else { "No images found." }
                    }
                } @else {
                    div.grid style=(format!("grid-template-columns: repeat({}, 1fr);", view.col_count.max(1))) {
                        @for item in &view.items.items {
                            (file_item(item))
                        }
                    }
                }
                (pagination(view))
                footer {
                    div { "Directory: " (view.image_directory) }
                    @if let Some(host) = &view.build.host_name {
                        div {
                            "Host: " (host)
                            @if let Some(ip) = &view.build.ip_address { " (" (ip) ")" }
                        }
                    }
                    @if let Some(addr) = &view.build.bind_address {
                        div { "Serving on: " (addr) }
                    }
                    div { "Version " (view.build.version) " (" (view.build.commit_hash) ")" }
                }
            }
        },
    )
}

/// Inline view of an already sanitized HTML document.
pub fn document_page(title: &str, back_url: &str, sanitized: &str) -> Markup {
    layout(
        title,
        html! {
            main {
                p.parent { a href=(back_url) { "← Back" } }
                h1.document-title { (title) }
                article.document { (PreEscaped(sanitized)) }
            }
        },
    )
}
