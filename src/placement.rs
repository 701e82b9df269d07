//! Filesystem side of a run: rename, move or symlink one file at a time.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::PlacementError;
use crate::naming::generate_filename;
use crate::patterns::PatternMatcher;
use crate::rename_engine::VideoFile;
use crate::series_info::{basename, SeriesContext};
use crate::transcript::Transcript;

/// Per-run switches for [`place`].
#[derive(Debug, Clone, Default)]
pub struct PlacementOptions {
    /// Rename instead of symlinking. Rename mode always sets this.
    pub move_files: bool,
    pub is_movie: bool,
    pub rename_mode: bool,
    /// Prefix substituted into symlink targets.
    pub redirect_path: Option<PathBuf>,
}

/// Place one file and record the outcome.
///
/// Returns `Ok(false)` when rename mode finds the file already correctly named.
pub fn place(
    matcher: &PatternMatcher,
    file: &VideoFile,
    context: &SeriesContext,
    options: &PlacementOptions,
    transcript: &mut Transcript,
) -> Result<bool, PlacementError> {
    let new_name = generate_filename(
        matcher,
        &file.file_name,
        &context.series_name,
        &context.season_number,
        &file.extension,
        options.is_movie,
    );
    let target_file = context.final_target_dir.join(&new_name);

    if options.rename_mode && new_name == file.file_name {
        transcript.push(format!(
            "File '{}' is already correctly named, skipping",
            file.file_name
        ));
        return Ok(false);
    }

    resolve_conflict(&target_file)?;

    if options.move_files {
        fs::rename(&file.path, &target_file).map_err(|source| PlacementError::Move {
            name: new_name.clone(),
            source,
        })?;

        if options.rename_mode {
            transcript.push(format!("Renamed: {} -> {}", file.file_name, new_name));
        } else {
            transcript.push(format!(
                "Moved: {} -> {}",
                file.path.display(),
                target_file.display()
            ));
        }
    } else {
        let link_target = match &options.redirect_path {
            Some(redirect) => redirect_link_target(&file.path, redirect),
            None => file.path.clone(),
        };

        create_symlink(&link_target, &target_file).map_err(|source| symlink_error(&new_name, source))?;

        transcript.push(format!(
            "Linked: {} -> {}",
            target_file.display(),
            link_target.display()
        ));
    }

    debug!(from = %file.path.display(), to = %target_file.display(), "placed file");
    Ok(true)
}

/// Remove `target` if it is a symlink left by an earlier run.
///
/// Regular files and directories are never removed.
pub fn resolve_conflict(target: &Path) -> Result<(), PlacementError> {
    match fs::symlink_metadata(target) {
        Ok(meta) if meta.file_type().is_symlink() => {
            debug!(path = %target.display(), "removing stale symlink");
            fs::remove_file(target).map_err(|source| PlacementError::Conflict {
                path: target.to_path_buf(),
                source,
            })
        }
        Ok(_) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(PlacementError::Conflict {
            path: target.to_path_buf(),
            source,
        }),
    }
}

/// `redirect/<parent dir name>/<file name>` for a source file.
///
/// Lets a consumer with a different mount layout (e.g. another container)
/// resolve the link.
pub fn redirect_link_target(source_file: &Path, redirect_path: &Path) -> PathBuf {
    let mut target = redirect_path.to_path_buf();
    if let Some(parent) = source_file.parent().filter(|p| p.file_name().is_some()) {
        target.push(basename(parent));
    }
    target.push(basename(source_file));
    target
}

pub fn ensure_dir(dir: &Path) -> Result<(), PlacementError> {
    fs::create_dir_all(dir).map_err(|source| PlacementError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}

#[cfg(unix)]
fn create_symlink(original: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(original, link)
}

#[cfg(windows)]
fn create_symlink(original: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(original, link)
}

fn symlink_error(name: &str, source: io::Error) -> PlacementError {
    // Symlink creation is privilege-gated on Windows.
    if cfg!(windows) {
        PlacementError::SymlinkPrivilege { source }
    } else {
        PlacementError::Symlink {
            name: name.to_string(),
            source,
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn context(dir: &Path) -> SeriesContext {
        SeriesContext {
            series_name: "Show".to_string(),
            season_number: "01".to_string(),
            final_target_dir: dir.to_path_buf(),
        }
    }

    fn touch(path: &Path) {
        fs::write(path, b"video").unwrap();
    }

    #[test]
    fn test_redirect_link_target() {
        assert_eq!(
            redirect_link_target(Path::new("/data/ShowA/ep01.mkv"), Path::new("/mnt/remote")),
            PathBuf::from("/mnt/remote/ShowA/ep01.mkv")
        );
    }

    #[test]
    fn test_stale_symlink_is_replaced() {
        let tmp = TempDir::new().unwrap();
        let src_dir = tmp.path().join("Show");
        let out = tmp.path().join("out");
        fs::create_dir_all(&src_dir).unwrap();
        fs::create_dir_all(&out).unwrap();

        let source = src_dir.join("Show E01.mkv");
        touch(&source);
        std::os::unix::fs::symlink("/nowhere/old.mkv", out.join("Show.S01E01.mkv")).unwrap();

        let matcher = PatternMatcher::new().unwrap();
        let mut transcript = Transcript::new();
        let placed = place(
            &matcher,
            &VideoFile::new(source.clone()),
            &context(&out),
            &PlacementOptions::default(),
            &mut transcript,
        )
        .unwrap();

        assert!(placed);
        assert_eq!(fs::read_link(out.join("Show.S01E01.mkv")).unwrap(), source);
    }

    #[test]
    fn test_real_file_is_never_removed() {
        let tmp = TempDir::new().unwrap();
        let existing = tmp.path().join("Show.S01E01.mkv");
        touch(&existing);

        resolve_conflict(&existing).unwrap();
        assert!(existing.is_file());

        let source = tmp.path().join("Show E01.mkv");
        touch(&source);
        let matcher = PatternMatcher::new().unwrap();
        let mut transcript = Transcript::new();
        let err = place(
            &matcher,
            &VideoFile::new(source),
            &context(tmp.path()),
            &PlacementOptions::default(),
            &mut transcript,
        )
        .unwrap_err();

        assert!(matches!(err, PlacementError::Symlink { ref name, .. } if name == "Show.S01E01.mkv"));
        assert_eq!(fs::read(&existing).unwrap(), b"video");
    }

    #[test]
    fn test_rename_mode_skips_correct_names() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("Show.S01E02.mkv");
        touch(&source);

        let matcher = PatternMatcher::new().unwrap();
        let mut transcript = Transcript::new();
        let options = PlacementOptions {
            move_files: true,
            rename_mode: true,
            ..Default::default()
        };
        let placed = place(
            &matcher,
            &VideoFile::new(source.clone()),
            &context(tmp.path()),
            &options,
            &mut transcript,
        )
        .unwrap();

        assert!(!placed);
        assert!(source.is_file());
        assert_eq!(
            transcript.lines(),
            ["File 'Show.S01E02.mkv' is already correctly named, skipping"]
        );
    }

    #[test]
    fn test_series_named_after_root_stays_in_final_dir() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("Show E01.mkv");
        touch(&source);
        let season_dir = tmp.path().join("S01");
        fs::create_dir_all(&season_dir).unwrap();

        let ctx = SeriesContext {
            series_name: basename(Path::new("/")),
            season_number: "01".to_string(),
            final_target_dir: season_dir.clone(),
        };
        let matcher = PatternMatcher::new().unwrap();
        let mut transcript = Transcript::new();
        place(
            &matcher,
            &VideoFile::new(source.clone()),
            &ctx,
            &PlacementOptions::default(),
            &mut transcript,
        )
        .unwrap();

        assert_eq!(fs::read_link(season_dir.join(".S01E01.mkv")).unwrap(), source);
    }

    #[test]
    fn test_link_uses_redirect_path() {
        let tmp = TempDir::new().unwrap();
        let src_dir = tmp.path().join("ShowA");
        fs::create_dir_all(&src_dir).unwrap();
        let source = src_dir.join("ep01.mkv");
        touch(&source);

        let matcher = PatternMatcher::new().unwrap();
        let mut transcript = Transcript::new();
        let options = PlacementOptions {
            redirect_path: Some(PathBuf::from("/mnt/remote")),
            ..Default::default()
        };
        place(
            &matcher,
            &VideoFile::new(source),
            &context(tmp.path()),
            &options,
            &mut transcript,
        )
        .unwrap();

        let link = tmp.path().join("Show.S01E01.mkv");
        assert_eq!(
            fs::read_link(&link).unwrap(),
            PathBuf::from("/mnt/remote/ShowA/ep01.mkv")
        );
        assert_eq!(
            transcript.lines(),
            [format!("Linked: {} -> /mnt/remote/ShowA/ep01.mkv", link.display())]
        );
    }
}
