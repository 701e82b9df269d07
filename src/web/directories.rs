//! Directory browsing API used by the path pickers on the index page

use std::collections::HashSet;
use std::path::Path;

use axum::Json;
use axum::extract::Query;
use serde::{Deserialize, Serialize};
use tokio::fs;

#[derive(Debug, Default, Deserialize)]
pub struct DirectoryQuery {
    /// Directory to list (defaults to `/`)
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Parent,
    Directory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryListing {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub current_path: String,
    pub directories: Vec<DirectoryEntry>,
}

pub async fn list_directories(Query(query): Query<DirectoryQuery>) -> Json<DirectoryListing> {
    let path = query
        .path
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| "/".to_string());
    Json(browse(&path).await)
}

/// List the visible subdirectories of `path`, led by a `..` entry.
///
/// The `..` entry is returned even when `path` cannot be read, so the
/// browser can always navigate back up.
pub async fn browse(path: &str) -> DirectoryListing {
    let mut directories = Vec::new();

    if let Some(parent) = parent_path(path) {
        directories.push(DirectoryEntry {
            name: "..".to_string(),
            path: parent,
            kind: EntryKind::Parent,
        });
    }

    let mut dir = match fs::read_dir(path).await {
        Ok(dir) => dir,
        Err(e) => {
            return DirectoryListing {
                success: false,
                message: Some(format!("Cannot read directory: {}", e)),
                current_path: path.to_string(),
                directories,
            };
        }
    };

    let mut seen = HashSet::new();
    let mut children = Vec::new();
    while let Ok(Some(entry)) = dir.next_entry().await {
        let is_dir = entry.file_type().await.map(|ft| ft.is_dir()).unwrap_or(false);
        if !is_dir {
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') || !seen.insert(name.clone()) {
            continue;
        }

        children.push(DirectoryEntry {
            path: Path::new(path).join(&name).to_string_lossy().into_owned(),
            name,
            kind: EntryKind::Directory,
        });
    }
    children.sort_by(|a, b| a.name.cmp(&b.name));
    directories.extend(children);

    DirectoryListing {
        success: true,
        message: None,
        current_path: path.to_string(),
        directories,
    }
}

/// Parent of `path`, or `None` at a root.
pub fn parent_path(path: &str) -> Option<String> {
    if path.is_empty() || path == "/" {
        return None;
    }

    let parent = Path::new(path).parent()?;
    let parent = if parent.as_os_str().is_empty() {
        ".".to_string()
    } else {
        parent.to_string_lossy().into_owned()
    };

    (parent != path).then_some(parent)
}
