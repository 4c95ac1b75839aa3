use std::path::Path;

use serde::{Deserialize, Serialize};

/// Periscope configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Items per page when the request does not say
    #[serde(default = "default_per_page")]
    pub default_per_page: usize,

    /// Grid columns when the request does not say
    #[serde(default = "default_col_count")]
    pub default_col_count: usize,

    /// Extensions shown as images
    #[serde(default = "default_image_extensions")]
    pub image_extensions: Vec<String>,

    /// Extensions shown through the HTML viewer
    #[serde(default = "default_html_extensions")]
    pub html_extensions: Vec<String>,

    /// Label of the top node in the navigation tree
    #[serde(default = "default_root_label")]
    pub root_label: String,
}

fn default_per_page() -> usize {
    100
}

fn default_col_count() -> usize {
    3
}

fn default_image_extensions() -> Vec<String> {
    vec![
        ".png".to_string(),
        ".jpg".to_string(),
        ".jpeg".to_string(),
        ".gif".to_string(),
        ".bmp".to_string(),
        ".tiff".to_string(),
    ]
}

fn default_html_extensions() -> Vec<String> {
    vec![".html".to_string(), ".htm".to_string()]
}

fn default_root_label() -> String {
    "Root".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_per_page: default_per_page(),
            default_col_count: default_col_count(),
            image_extensions: default_image_extensions(),
            html_extensions: default_html_extensions(),
            root_label: default_root_label(),
        }
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Check if an extension (with leading dot) is an image
    pub fn is_image_extension(&self, ext: &str) -> bool {
        self.image_extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }

    /// Check if an extension (with leading dot) is an HTML document
    pub fn is_html_extension(&self, ext: &str) -> bool {
        self.html_extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }
}
