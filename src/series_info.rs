//! Series name, season number and destination directory inference.
//!
//! Everything here works from names alone: the source directory, the target
//! directory (and its parent) and the video file names.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, warn};

use crate::patterns::PatternMatcher;
use crate::rename_engine::VideoFile;

const DEFAULT_SEASON: &str = "01";

/// Naming decisions shared by every file of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesContext {
    pub series_name: String,
    pub season_number: String,
    pub final_target_dir: PathBuf,
}

/// Infer the series context from absolute source/target paths.
///
/// If the target basename already looks like a season directory (`S02`), the
/// series name comes from its parent and files go straight into it. Otherwise
/// the source basename names the series and the season is detected.
///
/// Rename runs pass the source as the target, so several files end up in
/// `source/Sxx` while a single file stays where it is.
pub fn infer(
    matcher: &PatternMatcher,
    abs_source_dir: &Path,
    abs_target_dir: &Path,
    video_files: &[VideoFile],
) -> SeriesContext {
    let target_basename = basename(abs_target_dir);

    if matcher.is_season_dir(&target_basename) {
        let season_number = matcher
            .season_number(&target_basename)
            .unwrap_or_else(|| DEFAULT_SEASON.to_string());
        let series_name = basename(parent_dir(abs_target_dir));
        debug!(%series_name, %season_number, "target is already a season directory");

        return SeriesContext {
            series_name,
            season_number,
            final_target_dir: abs_target_dir.to_path_buf(),
        };
    }

    let series_name = basename(abs_source_dir);
    let season_number = detect_season(matcher, abs_target_dir, video_files);

    // A single file is treated as a movie: no season folder.
    let final_target_dir = if video_files.len() == 1 {
        abs_target_dir.to_path_buf()
    } else {
        series_target_dir(abs_source_dir, abs_target_dir, &season_number)
    };
    debug!(
        %series_name,
        %season_number,
        final_target_dir = %final_target_dir.display(),
        "inferred series context"
    );

    SeriesContext {
        series_name,
        season_number,
        final_target_dir,
    }
}

/// Season from the target name, then its parent, then the file names.
pub fn detect_season(
    matcher: &PatternMatcher,
    abs_target_dir: &Path,
    video_files: &[VideoFile],
) -> String {
    if let Some(season) = matcher.season_number(&basename(abs_target_dir)) {
        return season;
    }

    if let Some(season) = matcher.season_number(&basename(parent_dir(abs_target_dir))) {
        return season;
    }

    video_files
        .iter()
        .find_map(|file| matcher.season_number(&file.file_name))
        .unwrap_or_else(|| DEFAULT_SEASON.to_string())
}

/// `target/Sxx` when the target is already named after the series, else
/// `target/<series>/Sxx`. The directory is created right away.
pub fn series_target_dir(abs_source_dir: &Path, abs_target_dir: &Path, season_number: &str) -> PathBuf {
    let source_basename = basename(abs_source_dir);
    let season_dir = format!("S{}", season_number);

    let final_dir = if basename(abs_target_dir) == source_basename {
        abs_target_dir.join(season_dir)
    } else {
        abs_target_dir.join(source_basename).join(season_dir)
    };

    // Failure resurfaces when the placement step ensures the directory.
    if let Err(e) = fs::create_dir_all(&final_dir) {
        warn!(dir = %final_dir.display(), error = %e, "could not create season directory");
    }

    final_dir
}

/// Absolute, lexically cleaned path. Symlinks are not resolved.
pub fn absolute_path(path: &Path) -> io::Result<PathBuf> {
    let abs = std::path::absolute(path)?;
    Ok(clean_path(&abs))
}

fn clean_path(path: &Path) -> PathBuf {
    let mut cleaned = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                cleaned.pop();
            }
            other => cleaned.push(other),
        }
    }
    cleaned
}

/// Last path component, or an empty string for a root.
///
/// Never yields a separator, so the result is always safe to join.
pub fn basename(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn parent_dir(path: &Path) -> &Path {
    path.parent().unwrap_or(path)
}
