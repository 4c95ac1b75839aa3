//! Test utilities and common setup.

#![allow(dead_code)]

use std::path::Path;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use image_periscope::{router, AppState, BuildInfo, Config};
use tempfile::TempDir;
use tower::ServiceExt;

/// Bytes written to `subdir1/image2.png` in the fixture tree.
pub const IMAGE2_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nnot-really-a-png";

/// Create the fixture tree:
///
/// ```text
/// image1.jpg
/// notes.txt
/// page.html
/// subdir1/image2.png
/// subdir1/nested/image2-copy.gif
/// subdir2/image3.gif
/// subdir2/latin1.htm
/// ```
pub fn fixture_tree() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    std::fs::create_dir_all(root.join("subdir1/nested")).unwrap();
    std::fs::create_dir_all(root.join("subdir2")).unwrap();

    std::fs::write(root.join("image1.jpg"), b"jpg").unwrap();
    std::fs::write(root.join("notes.txt"), b"ignored").unwrap();
    std::fs::write(
        root.join("page.html"),
        b"<h1>Test</h1><script>alert(1)</script><p onclick=\"x()\">body</p>",
    )
    .unwrap();
    std::fs::write(root.join("subdir1/image2.png"), IMAGE2_BYTES).unwrap();
    std::fs::write(root.join("subdir1/nested/image2-copy.gif"), b"gif").unwrap();
    std::fs::write(root.join("subdir2/image3.gif"), b"gif").unwrap();
    std::fs::write(root.join("subdir2/latin1.htm"), b"<p>caf\xe9</p>").unwrap();

    temp_dir
}

/// Create a test application serving `root`.
pub fn test_app(root: &Path) -> Router {
    test_app_with_config(root, Config::default())
}

pub fn test_app_with_config(root: &Path, config: Config) -> Router {
    let build = BuildInfo {
        commit_hash: "abc1234".to_string(),
        ..BuildInfo::default()
    };
    router(AppState::with_config(root.to_path_buf(), config, build))
}

/// Issue a GET request against the router.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .method(Method::GET)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Collect a response body as bytes.
pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), 16 * 1024 * 1024)
        .await
        .unwrap()
        .to_vec()
}

/// Collect a response body as text.
pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}
