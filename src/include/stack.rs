//! Include stack: suspended scanner states across file boundaries
//!
//! The stack owns every open frame. The top frame is the active byte
//! source; pushing suspends the current frame in place and popping
//! resumes it exactly where it stopped. A flat set of canonicalized
//! paths rides alongside the frames for cycle detection, so ownership
//! stays acyclic.

use crate::config::compile_time::include::MAX_INCLUDE_DEPTH;
use crate::config::runtime::FileSourcePreferences;
use crate::file_source::FileSource;
use crate::logging::codes;
use crate::{log_debug, log_success};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::DirectoryIterator;

/// One suspended-or-active scanning state over one file
#[derive(Debug)]
pub struct ScanFrame {
    source: FileSource,
    directory: Option<DirectoryIterator>,
    canonical_path: Option<PathBuf>,
}

impl ScanFrame {
    fn new(
        source: FileSource,
        directory: Option<DirectoryIterator>,
        canonical_path: Option<PathBuf>,
    ) -> Self {
        Self {
            source,
            directory,
            canonical_path,
        }
    }

    pub fn source(&self) -> &FileSource {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut FileSource {
        &mut self.source
    }
}

/// The ordered stack of scan frames plus the cycle-detection path set
#[derive(Debug)]
pub struct IncludeStack {
    frames: Vec<ScanFrame>,
    active_paths: HashSet<PathBuf>,
}

impl IncludeStack {
    /// Install the root frame.
    ///
    /// The root path is seeded into the cycle set (when it can be
    /// canonicalized) so a file including itself is caught at the first
    /// directive.
    pub fn new(root: FileSource) -> Self {
        let canonical = std::fs::canonicalize(root.path()).ok();
        let mut active_paths = HashSet::new();
        if let Some(path) = &canonical {
            active_paths.insert(path.clone());
        }
        Self {
            frames: vec![ScanFrame::new(root, None, canonical)],
            active_paths,
        }
    }

    /// Number of frames currently on the stack (root counts as 1)
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Whether only the root frame remains
    pub fn at_root(&self) -> bool {
        self.frames.len() == 1
    }

    fn active_frame(&self) -> &ScanFrame {
        // The stack is never empty: the root frame is installed at
        // construction and pop() refuses to remove it
        self.frames.last().expect("include stack holds the root frame")
    }

    fn active_frame_mut(&mut self) -> &mut ScanFrame {
        self.frames.last_mut().expect("include stack holds the root frame")
    }

    /// The active byte source (the top frame's)
    pub fn active_source(&self) -> &FileSource {
        &self.active_frame().source
    }

    pub fn active_source_mut(&mut self) -> &mut FileSource {
        &mut self.active_frame_mut().source
    }

    /// Line number of the active frame, for stamping diagnostics
    pub fn active_line(&self) -> u32 {
        self.active_source().line()
    }

    /// Path of the active frame, for stamping diagnostics
    pub fn active_path(&self) -> &Path {
        self.active_source().path()
    }

    /// Resolve a directive path against the directory of the active
    /// frame's file. Absolute paths pass through; relative paths from an
    /// in-memory root (no parent directory) resolve against the process
    /// working directory.
    pub fn resolve(&self, raw: &Path) -> PathBuf {
        if raw.is_absolute() {
            return raw.to_path_buf();
        }
        match self.active_path().parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.join(raw),
            _ => raw.to_path_buf(),
        }
    }

    /// Open `resolved` and make it the active frame, suspending the
    /// current one. `directory` attaches an in-progress directory
    /// iteration to the new frame so pop() can continue it.
    pub fn push_file(
        &mut self,
        resolved: &Path,
        directory: Option<DirectoryIterator>,
        prefs: &FileSourcePreferences,
    ) -> Result<(), super::IncludeError> {
        if self.frames.len() >= MAX_INCLUDE_DEPTH {
            return Err(super::IncludeError::TooDeep {
                depth: self.frames.len(),
                limit: MAX_INCLUDE_DEPTH,
            });
        }

        let canonical = std::fs::canonicalize(resolved).map_err(|e| {
            super::IncludeError::OpenFailed {
                path: resolved.display().to_string(),
                message: e.to_string(),
            }
        })?;

        if self.active_paths.contains(&canonical) {
            return Err(super::IncludeError::Cycle {
                path: canonical.display().to_string(),
            });
        }

        let source = FileSource::open_with_preferences(resolved, prefs).map_err(|e| {
            super::IncludeError::OpenFailed {
                path: resolved.display().to_string(),
                message: e.to_string(),
            }
        })?;

        log_success!(codes::success::INCLUDE_PUSHED, "Include frame pushed",
            "file" => resolved.display(),
            "from" => self.active_path().display(),
            "depth" => self.frames.len() + 1);

        self.active_paths.insert(canonical.clone());
        self.frames
            .push(ScanFrame::new(source, directory, Some(canonical)));
        Ok(())
    }

    /// Close the active frame and resume its parent.
    ///
    /// Returns the popped frame's directory iterator (if one was
    /// attached and still has entries) so the caller can push the next
    /// file. Returns `None` without popping when only the root remains.
    pub fn pop(&mut self) -> Option<Option<DirectoryIterator>> {
        if self.at_root() {
            return None;
        }
        let frame = self.frames.pop()?;
        if let Some(path) = &frame.canonical_path {
            self.active_paths.remove(path);
        }
        log_debug!("Include frame popped",
            "file" => frame.source.path().display(),
            "resumed" => self.active_path().display(),
            "resumed_line" => self.active_line());
        match frame.directory {
            Some(iter) if !iter.is_exhausted() => Some(Some(iter)),
            _ => Some(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn prefs() -> FileSourcePreferences {
        FileSourcePreferences {
            require_cfg_extension: false,
            log_read_metrics: false,
        }
    }

    #[test]
    fn test_push_and_pop_restores_parent_state() {
        let dir = tempdir().unwrap();
        let root_path = dir.path().join("root.cfg");
        let inc_path = dir.path().join("inc.cfg");
        fs::write(&root_path, "a\nb\n").unwrap();
        fs::write(&inc_path, "c\n").unwrap();

        let root = FileSource::open(&root_path).unwrap();
        let mut stack = IncludeStack::new(root);

        // consume the first line of the root before suspending
        while stack.active_source().line() == 1 {
            stack.active_source_mut().bump();
        }
        assert_eq!(stack.active_line(), 2);

        stack.push_file(&inc_path, None, &prefs()).unwrap();
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.active_line(), 1);
        assert_eq!(stack.active_path(), inc_path.as_path());

        stack.pop().unwrap();
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.active_line(), 2);
        assert_eq!(stack.active_path(), root_path.as_path());
    }

    #[test]
    fn test_cycle_detection() {
        let dir = tempdir().unwrap();
        let root_path = dir.path().join("root.cfg");
        let inc_path = dir.path().join("inc.cfg");
        fs::write(&root_path, "").unwrap();
        fs::write(&inc_path, "").unwrap();

        let mut stack = IncludeStack::new(FileSource::open(&root_path).unwrap());
        stack.push_file(&inc_path, None, &prefs()).unwrap();

        // including either file again closes a cycle
        assert!(matches!(
            stack.push_file(&root_path, None, &prefs()),
            Err(crate::include::IncludeError::Cycle { .. })
        ));
        assert!(matches!(
            stack.push_file(&inc_path, None, &prefs()),
            Err(crate::include::IncludeError::Cycle { .. })
        ));
    }

    #[test]
    fn test_cycle_clears_on_pop() {
        let dir = tempdir().unwrap();
        let root_path = dir.path().join("root.cfg");
        let inc_path = dir.path().join("inc.cfg");
        fs::write(&root_path, "").unwrap();
        fs::write(&inc_path, "").unwrap();

        let mut stack = IncludeStack::new(FileSource::open(&root_path).unwrap());
        stack.push_file(&inc_path, None, &prefs()).unwrap();
        stack.pop().unwrap();

        // the same file may be included again sequentially
        assert!(stack.push_file(&inc_path, None, &prefs()).is_ok());
    }

    #[test]
    fn test_depth_limit() {
        let dir = tempdir().unwrap();
        let root_path = dir.path().join("root.cfg");
        fs::write(&root_path, "").unwrap();
        let mut stack = IncludeStack::new(FileSource::open(&root_path).unwrap());

        let mut last_err = None;
        for i in 0..MAX_INCLUDE_DEPTH + 1 {
            let p = dir.path().join(format!("f{}.cfg", i));
            fs::write(&p, "").unwrap();
            if let Err(e) = stack.push_file(&p, None, &prefs()) {
                last_err = Some(e);
                break;
            }
        }
        assert!(matches!(
            last_err,
            Some(crate::include::IncludeError::TooDeep { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_open_failure() {
        let dir = tempdir().unwrap();
        let root_path = dir.path().join("root.cfg");
        fs::write(&root_path, "").unwrap();
        let mut stack = IncludeStack::new(FileSource::open(&root_path).unwrap());

        assert!(matches!(
            stack.push_file(&dir.path().join("absent.cfg"), None, &prefs()),
            Err(crate::include::IncludeError::OpenFailed { .. })
        ));
        // the failed push leaves the stack unchanged
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_pop_refuses_root() {
        let dir = tempdir().unwrap();
        let root_path = dir.path().join("root.cfg");
        fs::write(&root_path, "").unwrap();
        let mut stack = IncludeStack::new(FileSource::open(&root_path).unwrap());
        assert!(stack.pop().is_none());
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_resolve_relative_to_including_file() {
        let dir = tempdir().unwrap();
        let sub = dir.path().join("conf");
        fs::create_dir(&sub).unwrap();
        let root_path = sub.join("root.cfg");
        fs::write(&root_path, "").unwrap();

        let stack = IncludeStack::new(FileSource::open(&root_path).unwrap());
        assert_eq!(stack.resolve(Path::new("extra.cfg")), sub.join("extra.cfg"));

        let absolute = dir.path().join("abs.cfg");
        assert_eq!(stack.resolve(&absolute), absolute);
    }
}
