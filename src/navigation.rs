use crate::listing::url_for;

/// One page of a sorted item list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
}

/// Slice `items[(page-1)*per_page .. page*per_page]`.
///
/// `page` and `per_page` below 1 are treated as 1. Pages past the end are
/// empty.
pub fn paginate<T>(items: Vec<T>, page: usize, per_page: usize) -> Page<T> {
    let page = page.max(1);
    let per_page = per_page.max(1);
    let total = items.len();
    let total_pages = total.div_ceil(per_page);

    let start = (page - 1).saturating_mul(per_page);
    let items = items.into_iter().skip(start).take(per_page).collect();

    Page {
        items,
        page,
        per_page,
        total,
        total_pages,
    }
}

/// Breadcrumb link toward the root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breadcrumb {
    pub name: String,
    pub url: String,
}

/// Split a root-relative path on `/` into cumulative breadcrumb links.
pub fn breadcrumbs(path: &str) -> Vec<Breadcrumb> {
    let mut crumbs = Vec::new();
    let mut acc = String::new();

    for part in path.split('/').filter(|p| !p.is_empty()) {
        if !acc.is_empty() {
            acc.push('/');
        }
        acc.push_str(part);
        crumbs.push(Breadcrumb {
            name: part.to_string(),
            url: url_for("/browse", &acc),
        });
    }

    crumbs
}

/// Parent of a root-relative path: `None` at the root, `""` one level down.
pub fn parent_path(path: &str) -> Option<String> {
    let path = path.trim_matches('/');
    if path.is_empty() {
        return None;
    }

    Some(match path.rsplit_once('/') {
        Some((parent, _)) => parent.to_string(),
        None => String::new(),
    })
}

/// Link to a parent path produced by [`parent_path`].
pub fn parent_url(parent: &str) -> String {
    if parent.is_empty() {
        "/".to_string()
    } else {
        url_for("/browse", parent)
    }
}
