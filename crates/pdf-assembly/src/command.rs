//! Command lifecycle and output-file ownership
//!
//! Every pipeline stage is a [`Command`] writing one or more PDF files. Output slots
//! left empty at construction are filled with freshly allocated temporary files when
//! the command executes. Those files belong to the command and are removed when its
//! [`Outputs`] are closed or dropped. Caller-named files are never removed.

use crate::constants::{TEMP_FILE_PREFIX, TEMP_FILE_SUFFIX};
use crate::types::*;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// One output position of a command
#[derive(Debug, Clone, PartialEq, Eq)]
enum Slot {
    /// Path supplied by the caller
    Named(PathBuf),
    /// Path allocated by [`Outputs::resolve`]; removed on close
    Owned(PathBuf),
    /// Not resolved yet
    Empty,
}

impl Slot {
    fn path(&self) -> Option<&Path> {
        match self {
            Slot::Named(path) | Slot::Owned(path) => Some(path),
            Slot::Empty => None,
        }
    }
}

/// The output files of a command and the policy for cleaning them up.
#[derive(Debug)]
pub struct Outputs {
    slots: Vec<Slot>,
    temp_dir: Option<PathBuf>,
    autodelete: bool,
}

impl Outputs {
    /// A single output; `None` allocates a temporary file on execution
    pub fn single(path: Option<PathBuf>) -> Self {
        Self::multiple([path])
    }

    /// A single caller-owned output
    pub fn named(path: impl Into<PathBuf>) -> Self {
        Self::single(Some(path.into()))
    }

    /// A single temporary output
    pub fn temporary() -> Self {
        Self::single(None)
    }

    /// Several outputs, in order; each `None` is allocated on execution
    pub fn multiple(paths: impl IntoIterator<Item = Option<PathBuf>>) -> Self {
        Self {
            slots: paths
                .into_iter()
                .map(|path| path.map_or(Slot::Empty, Slot::Named))
                .collect(),
            temp_dir: None,
            autodelete: false,
        }
    }

    /// No outputs at all
    pub fn none() -> Self {
        Self::multiple([])
    }

    /// Builder form of [`Outputs::set_temp_dir`]
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.set_temp_dir(dir);
        self
    }

    /// Allocate temporary files in `dir` instead of the system temp directory
    pub fn set_temp_dir(&mut self, dir: impl Into<PathBuf>) {
        self.temp_dir = Some(dir.into());
    }

    /// Fill every empty slot with a uniquely named temporary file.
    ///
    /// Returns all output paths in slot order. Calling this again is a no-op for
    /// slots that are already resolved.
    pub fn resolve(&mut self) -> Result<Vec<PathBuf>> {
        for slot in self.slots.iter_mut() {
            if *slot == Slot::Empty {
                let path = allocate_temp_file(self.temp_dir.as_deref())?;
                log::debug!("Allocated temporary output {}", path.display());
                *slot = Slot::Owned(path);
                self.autodelete = true;
            }
        }

        Ok(self.slots.iter().filter_map(Slot::path).map(Path::to_path_buf).collect())
    }

    /// First resolved output path
    pub fn path(&self) -> Option<&Path> {
        self.slots.first().and_then(Slot::path)
    }

    /// All resolved output paths
    pub fn paths(&self) -> Vec<&Path> {
        self.slots.iter().filter_map(Slot::path).collect()
    }

    /// Number of output slots
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Whether owned files are removed on close
    pub fn autodelete(&self) -> bool {
        self.autodelete
    }

    /// Whether `path` was allocated by these outputs
    pub fn is_owned(&self, path: &Path) -> bool {
        self.slots
            .iter()
            .any(|slot| matches!(slot, Slot::Owned(owned) if owned == path))
    }

    /// Release ownership of allocated files; the caller becomes responsible for them.
    pub fn keep(&mut self) -> Vec<PathBuf> {
        let mut kept = Vec::new();
        for slot in self.slots.iter_mut() {
            if let Slot::Owned(path) = slot {
                kept.push(path.clone());
                *slot = Slot::Named(path.clone());
            }
        }
        self.autodelete = false;
        kept
    }

    /// Remove every owned file.
    ///
    /// Files that are already gone are ignored. Every owned file is attempted once;
    /// the first other failure is returned. Caller-named files are left alone.
    pub fn close(&mut self) -> Result<()> {
        if !self.autodelete {
            return Ok(());
        }
        self.autodelete = false;

        let mut first_error = None;
        for slot in &self.slots {
            if let Slot::Owned(path) = slot {
                log::debug!("Removing temporary output {}", path.display());
                if let Err(err) = remove_safely(path) {
                    first_error.get_or_insert(err);
                }
            }
        }

        match first_error {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }
}

impl Drop for Outputs {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            log::warn!("Failed to clean up temporary output: {}", err);
        }
    }
}

/// Remove a file, treating "not found" as success
pub fn remove_safely(path: &Path) -> std::io::Result<()> {
    match std::fs::remove_file(path) {
        Err(err) if err.kind() != ErrorKind::NotFound => Err(err),
        _ => Ok(()),
    }
}

fn allocate_temp_file(dir: Option<&Path>) -> Result<PathBuf> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(TEMP_FILE_PREFIX).suffix(TEMP_FILE_SUFFIX);

    let file = match dir {
        Some(dir) => builder.tempfile_in(dir)?,
        None => builder.tempfile()?,
    };

    // The empty file stays on disk so the name cannot be reused before the stage
    // writes to it.
    let path = file.into_temp_path().keep().map_err(|err| err.error)?;
    Ok(path)
}

/// A pipeline stage that writes PDF files.
///
/// `execute` resolves the outputs, then hands the resolved paths to `run`. Dropping
/// the command drops its [`Outputs`], which removes any allocated files.
pub trait Command {
    type Error: From<AssemblyError>;

    /// Stage name used in logs and error messages
    fn stage(&self) -> &'static str;

    fn outputs(&self) -> &Outputs;

    fn outputs_mut(&mut self) -> &mut Outputs;

    /// Perform the transformation into already-resolved output paths
    fn run(&mut self, outputs: &[PathBuf]) -> std::result::Result<(), Self::Error>;

    fn execute(&mut self) -> std::result::Result<(), Self::Error> {
        let paths = self.outputs_mut().resolve()?;
        self.run(&paths)
    }

    /// First output path, available once resolved
    fn output_path(&self) -> Option<&Path> {
        self.outputs().path()
    }

    /// Remove owned outputs now rather than at drop
    fn close(&mut self) -> std::result::Result<(), Self::Error> {
        self.outputs_mut().close()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct WriteBytes {
        output: Outputs,
        runs: usize,
    }

    impl Command for WriteBytes {
        type Error = AssemblyError;

        fn stage(&self) -> &'static str {
            "write"
        }

        fn outputs(&self) -> &Outputs {
            &self.output
        }

        fn outputs_mut(&mut self) -> &mut Outputs {
            &mut self.output
        }

        fn run(&mut self, outputs: &[PathBuf]) -> Result<()> {
            self.runs += 1;
            for path in outputs {
                std::fs::write(path, b"%PDF-1.7")?;
            }
            Ok(())
        }
    }

    #[test]
    fn test_temporary_output_is_removed_on_drop() {
        let dir = TempDir::new().unwrap();
        let mut output = Outputs::temporary();
        output.set_temp_dir(dir.path());
        let mut cmd = WriteBytes { output, runs: 0 };

        cmd.execute().unwrap();
        assert!(cmd.outputs().autodelete());
        let path = cmd.output_path().unwrap().to_path_buf();
        assert!(path.exists());
        assert!(path.starts_with(dir.path()));
        assert_eq!(path.extension().unwrap(), "pdf");

        drop(cmd);
        assert!(!path.exists());
    }

    #[test]
    fn test_named_output_is_never_removed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("final.pdf");
        let mut cmd = WriteBytes {
            output: Outputs::named(&path),
            runs: 0,
        };

        cmd.execute().unwrap();
        assert!(!cmd.outputs().autodelete());
        cmd.outputs_mut().autodelete = true;
        cmd.close().unwrap();
        drop(cmd);

        assert!(path.exists());
    }

    #[test]
    fn test_close_tolerates_missing_file() {
        let mut output = Outputs::temporary();
        let paths = output.resolve().unwrap();
        std::fs::remove_file(&paths[0]).unwrap();

        assert!(output.close().is_ok());
    }

    #[test]
    fn test_close_removes_exactly_once() {
        let mut output = Outputs::temporary();
        let paths = output.resolve().unwrap();
        output.close().unwrap();
        assert!(!paths[0].exists());

        // A file recreated under the same name no longer belongs to the outputs
        std::fs::write(&paths[0], b"x").unwrap();
        output.close().unwrap();
        assert!(paths[0].exists());
        std::fs::remove_file(&paths[0]).unwrap();
    }

    #[test]
    fn test_zero_outputs_is_noop() {
        let mut output = Outputs::none();
        assert!(output.resolve().unwrap().is_empty());
        assert!(!output.autodelete());
        assert!(output.close().is_ok());
    }

    #[test]
    fn test_unexecuted_command_leaves_nothing_behind() {
        let cmd = WriteBytes {
            output: Outputs::temporary(),
            runs: 0,
        };
        assert!(cmd.output_path().is_none());
        assert_eq!(cmd.runs, 0);
    }

    #[test]
    fn test_multiple_outputs_mix_named_and_allocated() {
        let dir = TempDir::new().unwrap();
        let named = dir.path().join("named.pdf");
        let mut output = Outputs::multiple([None, Some(named.clone()), None]);
        output.set_temp_dir(dir.path());

        let paths = output.resolve().unwrap();
        assert_eq!(paths.len(), 3);
        assert_eq!(paths[1], named);
        assert!(output.is_owned(&paths[0]));
        assert!(!output.is_owned(&paths[1]));
        assert!(output.is_owned(&paths[2]));
        assert_ne!(paths[0], paths[2]);

        std::fs::write(&named, b"x").unwrap();
        output.close().unwrap();
        assert!(!paths[0].exists());
        assert!(named.exists());
        assert!(!paths[2].exists());
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let mut output = Outputs::temporary();
        let first = output.resolve().unwrap();
        let second = output.resolve().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_keep_transfers_ownership() {
        let mut output = Outputs::temporary();
        let paths = output.resolve().unwrap();
        let kept = output.keep();
        assert_eq!(kept, paths);
        drop(output);

        assert!(paths[0].exists());
        std::fs::remove_file(&paths[0]).unwrap();
    }
}
