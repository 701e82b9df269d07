use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{info, warn};

use crate::error::ProcessError;
use crate::patterns::PatternMatcher;
use crate::placement::{self, PlacementOptions};
use crate::series_info::{self, SeriesContext};
use crate::transcript::Transcript;

const VIDEO_EXTENSIONS: [&str; 2] = ["mkv", "mp4"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Rename files inside the source directory.
    Rename,
    /// Symlink files into the target tree.
    Link,
    /// Move files into the target tree.
    Move,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Rename => "rename",
            Mode::Link => "link",
            Mode::Move => "move",
        }
    }
}

impl FromStr for Mode {
    type Err = ProcessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "rename" => Ok(Mode::Rename),
            "link" => Ok(Mode::Link),
            "move" => Ok(Mode::Move),
            other => Err(ProcessError::UnsupportedMode(other.to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated processing request.
///
/// Rename works inside the source directory, so it carries neither a target
/// nor a redirect path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessRequest {
    pub source_dir: PathBuf,
    pub target_dir: Option<PathBuf>,
    pub mode: Mode,
    pub redirect_path: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct ProcessRequestBuilder {
    source_dir: Option<PathBuf>,
    target_dir: Option<PathBuf>,
    mode: Option<String>,
    redirect_path: Option<PathBuf>,
}

impl ProcessRequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.source_dir = non_empty(dir.as_ref());
        self
    }

    pub fn target_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.target_dir = non_empty(dir.as_ref());
        self
    }

    pub fn mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = Some(mode.into());
        self
    }

    pub fn redirect_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.redirect_path = non_empty(path.as_ref());
        self
    }

    pub fn build(self) -> Result<ProcessRequest, ProcessError> {
        let source_dir = self.source_dir.ok_or(ProcessError::EmptySourceDir)?;
        let mode = self.mode.unwrap_or_default();

        // Anything but rename relocates files, so the target is checked before
        // the mode itself is validated.
        if !matches!(mode.as_str(), "" | "rename") && self.target_dir.is_none() {
            return Err(ProcessError::MissingTargetDir);
        }
        let mode = mode.parse::<Mode>()?;

        let (target_dir, redirect_path) = match mode {
            Mode::Rename => (None, None),
            Mode::Link | Mode::Move => {
                let target = self.target_dir.ok_or(ProcessError::MissingTargetDir)?;
                (Some(target), self.redirect_path)
            }
        };

        Ok(ProcessRequest {
            source_dir,
            target_dir,
            mode,
            redirect_path,
        })
    }
}

fn non_empty(path: &Path) -> Option<PathBuf> {
    if path.as_os_str().is_empty() {
        None
    } else {
        Some(path.to_path_buf())
    }
}

/// A `.mkv`/`.mp4` file found directly under the source directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoFile {
    pub path: PathBuf,
    pub file_name: String,
    /// Extension with its leading dot, in its original case.
    pub extension: String,
}

impl VideoFile {
    pub fn new(path: PathBuf) -> Self {
        let file_name = series_info::basename(&path);
        let extension = path
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();
        Self {
            path,
            file_name,
            extension,
        }
    }
}

fn is_video_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| VIDEO_EXTENSIONS.iter().any(|v| ext.eq_ignore_ascii_case(v)))
        .unwrap_or(false)
}

/// List video files under `dir`, sorted by file name.
pub fn list_video_files(dir: &Path) -> Result<Vec<VideoFile>, ProcessError> {
    let entries = fs::read_dir(dir).map_err(|e| ProcessError::read_source(dir.to_path_buf(), e))?;

    let mut files: Vec<VideoFile> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|ft| !ft.is_dir()).unwrap_or(false))
        .map(|entry| entry.path())
        .filter(|path| is_video_extension(path))
        .map(VideoFile::new)
        .collect();

    files.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
    Ok(files)
}

/// Runs rename/link/move requests against the filesystem.
#[derive(Debug, Clone)]
pub struct RenameEngine {
    matcher: PatternMatcher,
}

impl RenameEngine {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            matcher: PatternMatcher::new()?,
        })
    }

    pub fn matcher(&self) -> &PatternMatcher {
        &self.matcher
    }

    /// Build a request from raw form values and run it.
    pub fn process_raw(
        &self,
        source_dir: &str,
        target_dir: &str,
        mode: &str,
        redirect_path: &str,
    ) -> Result<String, ProcessError> {
        let request = ProcessRequestBuilder::new()
            .source_dir(source_dir)
            .target_dir(target_dir)
            .mode(mode)
            .redirect_path(redirect_path)
            .build()?;
        self.process(&request)
    }

    /// Run one request to completion and return its transcript.
    ///
    /// Setup failures abort with an error; per-file failures are written to
    /// the transcript and the run goes on.
    pub fn process(&self, request: &ProcessRequest) -> Result<String, ProcessError> {
        info!(
            mode = %request.mode,
            source = %request.source_dir.display(),
            target_dir = ?request.target_dir,
            "processing request"
        );

        match (request.mode, request.target_dir.as_deref()) {
            (Mode::Rename, _) => self.rename_in_place(&request.source_dir),
            (Mode::Link | Mode::Move, Some(target_dir)) => self.link_or_move(
                &request.source_dir,
                target_dir,
                request.mode == Mode::Move,
                request.redirect_path.as_deref(),
            ),
            (Mode::Link | Mode::Move, None) => Err(ProcessError::MissingTargetDir),
        }
    }

    fn rename_in_place(&self, source_dir: &Path) -> Result<String, ProcessError> {
        let abs_source_dir = resolve(source_dir)?;
        let video_files = collect_video_files(&abs_source_dir)?;

        // The source doubles as the target: several files are gathered into
        // a season folder under it, a single file is renamed where it is.
        let mut transcript = Transcript::new();
        let context =
            self.describe_series(&abs_source_dir, &abs_source_dir, &video_files, &mut transcript);

        let options = PlacementOptions {
            move_files: true,
            is_movie: video_files.len() == 1,
            rename_mode: true,
            redirect_path: None,
        };
        let processed = self.place_all(&video_files, &context, &options, &mut transcript);

        if processed > 0 {
            transcript.push(format!("Done! Renamed {} file(s)", processed));
        } else {
            transcript.push("All files are already correctly named, nothing to do");
        }
        info!(processed, "rename finished");

        Ok(transcript.into_string())
    }

    fn link_or_move(
        &self,
        source_dir: &Path,
        target_dir: &Path,
        move_files: bool,
        redirect_path: Option<&Path>,
    ) -> Result<String, ProcessError> {
        let abs_source_dir = resolve(source_dir)?;
        let abs_target_dir = resolve(target_dir)?;
        validate_paths(&abs_source_dir, &abs_target_dir)?;

        // Listed before creating the target so a source without videos
        // leaves the target untouched.
        let video_files = collect_video_files(&abs_source_dir)?;

        fs::create_dir_all(&abs_target_dir).map_err(|source| ProcessError::CreateTargetDir {
            path: abs_target_dir.clone(),
            source,
        })?;

        let mut transcript = Transcript::new();
        let context =
            self.describe_series(&abs_source_dir, &abs_target_dir, &video_files, &mut transcript);

        if let Some(redirect) = redirect_path {
            transcript.push(format!("Source path: {}", source_dir.display()));
            transcript.push(format!("Using redirect path: {}", redirect.display()));
        }

        let options = PlacementOptions {
            move_files,
            is_movie: video_files.len() == 1,
            rename_mode: false,
            redirect_path: redirect_path.map(Path::to_path_buf),
        };
        let processed = self.place_all(&video_files, &context, &options, &mut transcript);

        match (processed, move_files) {
            (0, true) => transcript.push("No files needed moving"),
            (0, false) => transcript.push("No files needed linking"),
            (n, true) => transcript.push(format!("Done! Moved {} file(s)", n)),
            (n, false) => transcript.push(format!("Done! Created {} link(s)", n)),
        }
        info!(processed, move_files, "link/move finished");

        Ok(transcript.into_string())
    }

    fn describe_series(
        &self,
        abs_source_dir: &Path,
        abs_target_dir: &Path,
        video_files: &[VideoFile],
        transcript: &mut Transcript,
    ) -> SeriesContext {
        let context = series_info::infer(&self.matcher, abs_source_dir, abs_target_dir, video_files);
        transcript.push(format!("Using season: S{}", context.season_number));
        transcript.push(format!("Using series name: {}", context.series_name));
        context
    }

    fn place_all(
        &self,
        video_files: &[VideoFile],
        context: &SeriesContext,
        options: &PlacementOptions,
        transcript: &mut Transcript,
    ) -> usize {
        if let Err(e) = placement::ensure_dir(&context.final_target_dir) {
            transcript.error(&e);
            return 0;
        }

        let mut processed = 0;
        for file in video_files {
            match placement::place(&self.matcher, file, context, options, transcript) {
                Ok(true) => processed += 1,
                Ok(false) => {}
                Err(e) => {
                    warn!(file = %file.path.display(), error = %e, "file not placed");
                    transcript.error(&e);
                }
            }
        }
        processed
    }
}

fn resolve(path: &Path) -> Result<PathBuf, ProcessError> {
    series_info::absolute_path(path).map_err(|e| ProcessError::read_source(path.to_path_buf(), e))
}

fn collect_video_files(abs_source_dir: &Path) -> Result<Vec<VideoFile>, ProcessError> {
    let video_files = list_video_files(abs_source_dir)?;
    if video_files.is_empty() {
        return Err(ProcessError::NoVideoFiles(abs_source_dir.to_path_buf()));
    }
    Ok(video_files)
}

fn validate_paths(abs_source_dir: &Path, abs_target_dir: &Path) -> Result<(), ProcessError> {
    if abs_source_dir == abs_target_dir {
        return Err(ProcessError::PathConflict(abs_source_dir.to_path_buf()));
    }

    if !abs_source_dir.exists() {
        return Err(ProcessError::SourceNotFound(abs_source_dir.to_path_buf()));
    }

    let mut entries = fs::read_dir(abs_source_dir)
        .map_err(|e| ProcessError::read_source(abs_source_dir.to_path_buf(), e))?;
    if entries.next().is_none() {
        return Err(ProcessError::SourceEmpty(abs_source_dir.to_path_buf()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parsing() {
        assert_eq!("rename".parse::<Mode>().unwrap(), Mode::Rename);
        assert_eq!("".parse::<Mode>().unwrap(), Mode::Rename);
        assert_eq!("link".parse::<Mode>().unwrap(), Mode::Link);
        assert_eq!("move".parse::<Mode>().unwrap(), Mode::Move);
        assert!(matches!(
            "copy".parse::<Mode>(),
            Err(ProcessError::UnsupportedMode(m)) if m == "copy"
        ));
    }

    #[test]
    fn test_builder_rename_clears_target() {
        let request = ProcessRequestBuilder::new()
            .source_dir("/data/Show")
            .target_dir("/out")
            .redirect_path("/mnt/remote")
            .mode("rename")
            .build()
            .unwrap();

        assert_eq!(request.mode, Mode::Rename);
        assert_eq!(request.target_dir, None);
        assert_eq!(request.redirect_path, None);
    }

    #[test]
    fn test_builder_link_requires_target() {
        let err = ProcessRequestBuilder::new()
            .source_dir("/data/Show")
            .mode("link")
            .build()
            .unwrap_err();
        assert!(matches!(err, ProcessError::MissingTargetDir));
    }

    #[test]
    fn test_builder_requires_source() {
        let err = ProcessRequestBuilder::new()
            .source_dir("")
            .build()
            .unwrap_err();
        assert!(matches!(err, ProcessError::EmptySourceDir));
    }

    #[test]
    fn test_builder_defaults_to_rename() {
        let request = ProcessRequestBuilder::new()
            .source_dir("/data/Show")
            .build()
            .unwrap();
        assert_eq!(request.mode, Mode::Rename);
    }

    #[test]
    fn test_video_file_extension() {
        let file = VideoFile::new(PathBuf::from("/data/Show/Ep 1.MKV"));
        assert_eq!(file.file_name, "Ep 1.MKV");
        assert_eq!(file.extension, ".MKV");
        assert!(is_video_extension(&file.path));
        assert!(!is_video_extension(Path::new("/data/Show/notes.txt")));
        assert!(!is_video_extension(Path::new("/data/Show/mkv")));
    }

    #[test]
    fn test_unsupported_mode_fails_before_touching_disk() {
        let engine = RenameEngine::new().unwrap();
        let err = engine
            .process_raw("/does/not/exist", "/out", "copy", "")
            .unwrap_err();
        assert!(matches!(err, ProcessError::UnsupportedMode(_)));
    }
}
