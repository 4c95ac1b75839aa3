//! Web browser for a directory of images and HTML documents.
//!
//! The crate exposes the router so it can be served by the bundled binary or
//! embedded in another application. All browsing is scoped below a single
//! root directory fixed at startup.

pub mod config;
pub mod error;
pub mod handlers;
pub mod listing;
pub mod navigation;
pub mod resolver;
pub mod routes;
pub mod sanitize;
pub mod search;
pub mod tree;
pub mod views;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::debug;

pub use config::Config;
pub use error::PeriscopeError;

/// Build identifier shown when no commit hash file is available
pub const UNKNOWN_COMMIT: &str = "N/A";

/// Version and deployment details exposed read-only to pages
#[derive(Debug, Clone)]
pub struct BuildInfo {
    pub version: String,
    pub commit_hash: String,
    pub bind_address: Option<String>,
    /// Host name of the serving machine
    pub host_name: Option<String>,
    /// First address the host name resolves to
    pub ip_address: Option<String>,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            commit_hash: UNKNOWN_COMMIT.to_string(),
            bind_address: None,
            host_name: None,
            ip_address: None,
        }
    }
}

impl BuildInfo {
    /// Read the commit hash from a single-line file, falling back to `N/A`.
    pub fn with_commit_file(mut self, path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let hash = content.trim();
                if !hash.is_empty() {
                    self.commit_hash = hash.to_string();
                }
            }
            Err(e) => debug!("No commit hash at {}: {}", path.display(), e),
        }
        self
    }

    pub fn with_bind_address(mut self, addr: impl Into<String>) -> Self {
        self.bind_address = Some(addr.into());
        self
    }

    pub fn with_host(mut self, host_name: impl Into<String>, ip_address: Option<String>) -> Self {
        self.host_name = Some(host_name.into());
        self.ip_address = ip_address;
        self
    }
}

/// Process-wide settings, built once at startup
#[derive(Debug)]
pub struct Settings {
    /// Canonical root directory all requests are scoped beneath
    pub root_dir: PathBuf,
    pub config: Config,
    pub build: BuildInfo,
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Create a new AppState with the given root directory and default config.
    pub fn new(root_dir: PathBuf) -> Self {
        Self::with_config(root_dir, Config::default(), BuildInfo::default())
    }

    /// Create a new AppState with the given root directory, config and build info.
    ///
    /// The root is canonicalized when possible so containment checks compare
    /// like with like.
    pub fn with_config(root_dir: PathBuf, config: Config, build: BuildInfo) -> Self {
        let root_dir = root_dir.canonicalize().unwrap_or(root_dir);
        Self {
            settings: Arc::new(Settings {
                root_dir,
                config,
                build,
            }),
        }
    }

    pub fn root_dir(&self) -> &Path {
        &self.settings.root_dir
    }

    pub fn config(&self) -> &Config {
        &self.settings.config
    }

    pub fn build(&self) -> &BuildInfo {
        &self.settings.build
    }
}

/// Build the full application router with CORS, no-cache and tracing layers.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .merge(routes::browse_routes())
        .layer(cors)
        .layer(SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET, OPTIONS"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("content-type"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-cache, no-store, must-revalidate"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_build_info_reads_commit_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("COMMIT_HASH");
        std::fs::write(&path, "1a2b3c4\n").unwrap();

        let build = BuildInfo::default().with_commit_file(&path);
        assert_eq!(build.commit_hash, "1a2b3c4");
        assert_eq!(build.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_build_info_missing_commit_file() {
        let dir = TempDir::new().unwrap();
        let build = BuildInfo::default().with_commit_file(&dir.path().join("COMMIT_HASH"));
        assert_eq!(build.commit_hash, UNKNOWN_COMMIT);
    }

    #[test]
    fn test_build_info_with_host() {
        let build = BuildInfo::default().with_host("imagebox", Some("10.0.0.7".to_string()));
        assert_eq!(build.host_name.as_deref(), Some("imagebox"));
        assert_eq!(build.ip_address.as_deref(), Some("10.0.0.7"));
    }

    #[test]
    fn test_app_state_canonicalizes_root() {
        let dir = TempDir::new().unwrap();
        let state = AppState::new(dir.path().join("."));
        assert_eq!(state.root_dir(), dir.path().canonicalize().unwrap());
    }
}
