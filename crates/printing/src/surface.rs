//! Print surfaces: isolated contexts a rendered document is loaded into,
//! printed from, and torn down.
//!
//! Every print job gets its own surface. `SurfaceGuard` tears it down when
//! the job finishes, including on the error path.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use lomartex_core::JobId;

use crate::RenderedDocument;
use crate::error::SurfaceError;

/// One isolated print context.
pub trait PrintSurface: Send {
    /// Write the document into the surface.
    fn load(&mut self, document: &RenderedDocument) -> Result<(), SurfaceError>;

    /// Invoke the platform print action on the loaded document.
    fn print(&mut self) -> Result<(), SurfaceError>;

    /// Where the job ended up, if the surface has an addressable location.
    fn location(&self) -> Option<String> {
        None
    }

    /// Release everything the surface holds. Must tolerate repeated calls.
    fn teardown(&mut self) -> Result<(), SurfaceError>;
}

/// Hands out a fresh surface per print job.
pub trait SurfaceProvider: Send + Sync {
    fn acquire(&self, job_id: JobId, title: &str) -> Result<Box<dyn PrintSurface>, SurfaceError>;
}

/// Tears the wrapped surface down on drop unless `release` already did.
pub struct SurfaceGuard {
    surface: Option<Box<dyn PrintSurface>>,
    job_id: JobId,
}

impl SurfaceGuard {
    pub fn new(job_id: JobId, surface: Box<dyn PrintSurface>) -> Self {
        Self {
            surface: Some(surface),
            job_id,
        }
    }

    pub fn surface(&mut self) -> Result<&mut dyn PrintSurface, SurfaceError> {
        match self.surface.as_deref_mut() {
            Some(surface) => Ok(surface),
            None => Err(SurfaceError::Refused("surface already released".to_string())),
        }
    }

    /// Tear down now and report the outcome.
    pub fn release(mut self) -> Result<(), SurfaceError> {
        match self.surface.take() {
            Some(mut surface) => surface.teardown(),
            None => Ok(()),
        }
    }
}

impl Drop for SurfaceGuard {
    fn drop(&mut self) {
        if let Some(mut surface) = self.surface.take() {
            if let Err(e) = surface.teardown() {
                tracing::warn!(job_id = %self.job_id, error = %e, "print surface teardown failed");
            }
        }
    }
}

/// External program invoked with the spooled file path as its last argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl PrintCommand {
    /// Whitespace-split `program arg...`; `None` for a blank string.
    pub fn parse(command: &str) -> Option<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }
}

/// Spools each job to its own HTML file and optionally hands it to a print
/// command such as `lp`.
#[derive(Debug, Clone)]
pub struct SpoolDirectory {
    dir: PathBuf,
    command: Option<PrintCommand>,
    retain: Option<bool>,
}

impl SpoolDirectory {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            command: None,
            retain: None,
        }
    }

    pub fn with_command(mut self, command: Option<PrintCommand>) -> Self {
        self.command = command;
        self
    }

    /// Keep spooled files after the job. Defaults to on when no print
    /// command is configured, since the file is then the only output.
    pub fn with_retain(mut self, retain: Option<bool>) -> Self {
        self.retain = retain;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn retains_files(&self) -> bool {
        self.retain.unwrap_or(self.command.is_none())
    }
}

impl SurfaceProvider for SpoolDirectory {
    fn acquire(&self, job_id: JobId, title: &str) -> Result<Box<dyn PrintSurface>, SurfaceError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(format!("{job_id}.html"));
        tracing::debug!(%job_id, title, path = %path.display(), "spool surface acquired");
        Ok(Box::new(SpoolSurface {
            path,
            command: self.command.clone(),
            retain: self.retains_files(),
            loaded: false,
        }))
    }
}

struct SpoolSurface {
    path: PathBuf,
    command: Option<PrintCommand>,
    retain: bool,
    loaded: bool,
}

impl PrintSurface for SpoolSurface {
    fn load(&mut self, document: &RenderedDocument) -> Result<(), SurfaceError> {
        fs::write(&self.path, document.html.as_bytes())?;
        self.loaded = true;
        Ok(())
    }

    fn print(&mut self) -> Result<(), SurfaceError> {
        if !self.loaded {
            return Err(SurfaceError::Refused("nothing loaded to print".to_string()));
        }
        let Some(command) = &self.command else {
            return Ok(());
        };
        let status = Command::new(&command.program)
            .args(&command.args)
            .arg(&self.path)
            .status()?;
        if status.success() {
            Ok(())
        } else {
            Err(SurfaceError::Command {
                program: command.program.clone(),
                status: status.to_string(),
            })
        }
    }

    fn location(&self) -> Option<String> {
        self.retain.then(|| self.path.display().to_string())
    }

    fn teardown(&mut self) -> Result<(), SurfaceError> {
        if self.retain {
            return Ok(());
        }
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// A document captured by `MemorySurfaces`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedPrint {
    pub job_id: JobId,
    pub title: String,
    pub html: String,
}

#[derive(Debug, Default)]
struct MemoryState {
    refusal: Option<String>,
    printed: Vec<CapturedPrint>,
    open: usize,
    acquired: usize,
}

/// In-process surfaces that capture printed documents.
#[derive(Debug, Clone, Default)]
pub struct MemorySurfaces {
    state: Arc<Mutex<MemoryState>>,
}

impl MemorySurfaces {
    pub fn new() -> Self {
        Self::default()
    }

    /// A provider that refuses every surface, like a blocked pop-up.
    pub fn refusing(reason: impl Into<String>) -> Self {
        let surfaces = Self::default();
        surfaces.lock().refusal = Some(reason.into());
        surfaces
    }

    pub fn printed(&self) -> Vec<CapturedPrint> {
        self.lock().printed.clone()
    }

    /// Surfaces acquired and not yet torn down.
    pub fn open_surfaces(&self) -> usize {
        self.lock().open
    }

    pub fn acquired(&self) -> usize {
        self.lock().acquired
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SurfaceProvider for MemorySurfaces {
    fn acquire(&self, job_id: JobId, title: &str) -> Result<Box<dyn PrintSurface>, SurfaceError> {
        let mut state = self.lock();
        if let Some(reason) = &state.refusal {
            return Err(SurfaceError::Refused(reason.clone()));
        }
        state.open += 1;
        state.acquired += 1;
        Ok(Box::new(MemorySurface {
            job_id,
            title: title.to_string(),
            html: None,
            open: true,
            state: Arc::clone(&self.state),
        }))
    }
}

struct MemorySurface {
    job_id: JobId,
    title: String,
    html: Option<String>,
    open: bool,
    state: Arc<Mutex<MemoryState>>,
}

impl PrintSurface for MemorySurface {
    fn load(&mut self, document: &RenderedDocument) -> Result<(), SurfaceError> {
        self.html = Some(document.html.clone());
        Ok(())
    }

    fn print(&mut self) -> Result<(), SurfaceError> {
        let html = self
            .html
            .clone()
            .ok_or_else(|| SurfaceError::Refused("nothing loaded to print".to_string()))?;
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.printed.push(CapturedPrint {
            job_id: self.job_id,
            title: self.title.clone(),
            html,
        });
        Ok(())
    }

    fn teardown(&mut self) -> Result<(), SurfaceError> {
        if self.open {
            self.open = false;
            self.html = None;
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            state.open -= 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PrintError;
    use crate::layout::Layout;

    fn test_document() -> RenderedDocument {
        RenderedDocument {
            layout: Layout::Label,
            title: "Labels - LOMPL160126143005".to_string(),
            html: "<html></html>".to_string(),
            page_count: 1,
        }
    }

    fn scratch_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("lomartex-surface-{name}-{}", JobId::new()))
    }

    #[test]
    fn print_command_splits_on_whitespace() {
        assert_eq!(
            PrintCommand::parse("lp -d  zebra"),
            Some(PrintCommand {
                program: "lp".to_string(),
                args: vec!["-d".to_string(), "zebra".to_string()],
            })
        );
        assert_eq!(PrintCommand::parse("   "), None);
    }

    #[test]
    fn retention_defaults_on_only_without_a_command() {
        let spool = SpoolDirectory::new("/tmp/x");
        assert!(spool.retains_files());
        let spool = spool.with_command(PrintCommand::parse("lp"));
        assert!(!spool.retains_files());
        let spool = spool.with_retain(Some(true));
        assert!(spool.retains_files());
    }

    #[test]
    fn spool_surface_writes_one_file_per_job() {
        let dir = scratch_dir("write");
        let spool = SpoolDirectory::new(&dir);
        let job = JobId::new();

        let mut guard = SurfaceGuard::new(job, spool.acquire(job, "t").unwrap());
        let surface = guard.surface().unwrap();
        surface.load(&test_document()).unwrap();
        surface.print().unwrap();
        let location = surface.location().unwrap();
        guard.release().unwrap();

        assert_eq!(fs::read_to_string(&location).unwrap(), "<html></html>");
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn non_retaining_spool_removes_file_on_drop() {
        let dir = scratch_dir("drop");
        let spool = SpoolDirectory::new(&dir).with_retain(Some(false));
        let job = JobId::new();
        {
            let mut guard = SurfaceGuard::new(job, spool.acquire(job, "t").unwrap());
            guard.surface().unwrap().load(&test_document()).unwrap();
            assert!(dir.join(format!("{job}.html")).exists());
        }
        assert!(!dir.join(format!("{job}.html")).exists());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn print_command_success_removes_the_spooled_file() {
        let dir = scratch_dir("cmd-ok");
        let spool = SpoolDirectory::new(&dir).with_command(PrintCommand::parse("true"));
        let job = JobId::new();

        let mut guard = SurfaceGuard::new(job, spool.acquire(job, "t").unwrap());
        let surface = guard.surface().unwrap();
        surface.load(&test_document()).unwrap();
        surface.print().unwrap();
        assert_eq!(surface.location(), None);
        guard.release().unwrap();

        assert!(!dir.join(format!("{job}.html")).exists());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn failing_print_command_is_a_surface_error_and_leaves_no_file() {
        let dir = scratch_dir("cmd-fail");
        let spool = SpoolDirectory::new(&dir).with_command(PrintCommand::parse("false"));
        let job = JobId::new();

        let err = {
            let mut guard = SurfaceGuard::new(job, spool.acquire(job, "t").unwrap());
            let surface = guard.surface().unwrap();
            surface.load(&test_document()).unwrap();
            surface.print().unwrap_err()
        };
        match &err {
            SurfaceError::Command { program, .. } => assert_eq!(program, "false"),
            other => panic!("expected Command, got {other:?}"),
        }
        assert!(matches!(PrintError::from(err), PrintError::RenderSurface { .. }));

        assert!(!dir.join(format!("{job}.html")).exists());
        assert_eq!(fs::read_dir(&dir).unwrap().count(), 0);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn memory_surfaces_track_open_count_and_refusal() {
        let surfaces = MemorySurfaces::new();
        let job = JobId::new();
        let guard = SurfaceGuard::new(job, surfaces.acquire(job, "t").unwrap());
        assert_eq!(surfaces.open_surfaces(), 1);
        drop(guard);
        assert_eq!(surfaces.open_surfaces(), 0);

        let refusing = MemorySurfaces::refusing("pop-ups blocked");
        match refusing.acquire(JobId::new(), "t") {
            Err(SurfaceError::Refused(reason)) => assert_eq!(reason, "pop-ups blocked"),
            Err(other) => panic!("expected Refused, got {other:?}"),
            Ok(_) => panic!("expected refusal"),
        }
        assert_eq!(refusing.acquired(), 0);
    }
}
