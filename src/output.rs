//! Output directory resolution
//!
//! [`OutputResolver::resolve`] makes sure the preferred directory exists and is writable.
//! When that fails with a permission error it falls back to
//! `{temp_dir}/strategy_forge_sprites`. The first answer is cached, so every later call on
//! the same resolver returns the same directory and a run never splits its output.
//! A [`process_wide`](OutputResolver::process_wide) resolver also shares that answer with
//! every other process-wide resolver.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use log::{debug, info, warn};

use crate::error::{ForgeError, Result};

/// Subdirectory of the temp dir used when the preferred directory is not writable
pub const FALLBACK_DIR_NAME: &str = "strategy_forge_sprites";

/// First directory resolved by any process-wide resolver
static PROCESS_OUTPUT: Mutex<Option<ResolvedPath>> = Mutex::new(None);

/// File system access needed to resolve an output directory
pub trait DirectoryProbe {
    /// Creates `path` if needed and checks a file can be written in it
    fn ensure_writable(&self, path: &Path) -> io::Result<()>;

    fn temp_dir(&self) -> PathBuf;
}

/// The real file system
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFs;

impl DirectoryProbe for StdFs {
    fn ensure_writable(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)?;
        let probe = path.join(".sprite_forge_probe");
        fs::write(&probe, b"")?;
        let _ = fs::remove_file(&probe);
        Ok(())
    }

    fn temp_dir(&self) -> PathBuf {
        std::env::temp_dir()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    pub path: PathBuf,
    pub used_fallback: bool,
}

#[derive(Debug)]
pub struct OutputResolver<P: DirectoryProbe = StdFs> {
    probe: P,
    preferred: Option<PathBuf>,
    resolved: Option<ResolvedPath>,
    process_wide: bool,
}

impl Default for OutputResolver<StdFs> {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputResolver<StdFs> {
    pub fn new() -> Self {
        Self::with_probe(StdFs)
    }

    /// Resolver whose answer is shared by the whole process
    pub fn process_wide() -> Self {
        Self::new().shared()
    }
}

impl<P: DirectoryProbe> OutputResolver<P> {
    pub fn with_probe(probe: P) -> Self {
        Self {
            probe,
            preferred: None,
            resolved: None,
            process_wide: false,
        }
    }

    /// Reuses, or publishes, the directory resolved first in this process
    pub fn shared(mut self) -> Self {
        self.process_wide = true;
        self
    }

    /// Resolves once; later calls return the cached directory whatever they ask for
    pub fn resolve(&mut self, preferred: &Path) -> Result<ResolvedPath> {
        if let Some(resolved) = &self.resolved {
            if self.preferred.as_deref() != Some(preferred) {
                debug!(
                    "Output already resolved to {}, ignoring {}",
                    resolved.path.display(),
                    preferred.display()
                );
            }
            return Ok(resolved.clone());
        }

        if !self.process_wide {
            return self.resolve_fresh(preferred);
        }

        let mut process = PROCESS_OUTPUT.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(resolved) = process.as_ref() {
            debug!(
                "Reusing output directory {} resolved earlier in this process",
                resolved.path.display()
            );
            self.preferred = Some(preferred.to_path_buf());
            self.resolved = Some(resolved.clone());
            return Ok(resolved.clone());
        }

        let resolved = self.resolve_fresh(preferred)?;
        *process = Some(resolved.clone());
        Ok(resolved)
    }

    fn resolve_fresh(&mut self, preferred: &Path) -> Result<ResolvedPath> {
        let resolved = match self.probe.ensure_writable(preferred) {
            Ok(()) => ResolvedPath {
                path: preferred.to_path_buf(),
                used_fallback: false,
            },
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                let fallback = self.probe.temp_dir().join(FALLBACK_DIR_NAME);
                warn!(
                    "Output directory {} is not writable ({}), using {}",
                    preferred.display(),
                    e,
                    fallback.display()
                );
                self.probe
                    .ensure_writable(&fallback)
                    .map_err(|source| ForgeError::DirectoryUnwritable {
                        path: fallback.clone(),
                        source,
                    })?;
                ResolvedPath {
                    path: fallback,
                    used_fallback: true,
                }
            }
            Err(source) => {
                return Err(ForgeError::DirectoryUnwritable {
                    path: preferred.to_path_buf(),
                    source,
                })
            }
        };

        info!("Writing sprites to {}", resolved.path.display());
        self.preferred = Some(preferred.to_path_buf());
        self.resolved = Some(resolved.clone());
        Ok(resolved)
    }

    pub fn resolved(&self) -> Option<&ResolvedPath> {
        self.resolved.as_ref()
    }

    pub fn used_fallback(&self) -> bool {
        self.resolved.as_ref().is_some_and(|r| r.used_fallback)
    }

    pub fn preferred_path(&self) -> Option<&Path> {
        self.preferred.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Denies every path under `denied`, records every probe
    struct FakeProbe {
        denied: Vec<PathBuf>,
        temp: PathBuf,
        probed: RefCell<Vec<PathBuf>>,
    }

    impl FakeProbe {
        fn denying(denied: &[&str]) -> Self {
            Self {
                denied: denied.iter().map(PathBuf::from).collect(),
                temp: PathBuf::from("/tmp-fake"),
                probed: RefCell::new(Vec::new()),
            }
        }
    }

    impl DirectoryProbe for &FakeProbe {
        fn ensure_writable(&self, path: &Path) -> io::Result<()> {
            self.probed.borrow_mut().push(path.to_path_buf());
            if self.denied.iter().any(|d| path.starts_with(d)) {
                Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
            } else {
                Ok(())
            }
        }

        fn temp_dir(&self) -> PathBuf {
            self.temp.clone()
        }
    }

    #[test]
    fn test_writable_path_is_used_as_is() {
        let probe = FakeProbe::denying(&[]);
        let mut resolver = OutputResolver::with_probe(&probe);
        let resolved = resolver.resolve(Path::new("sprites")).unwrap();
        assert_eq!(resolved.path, PathBuf::from("sprites"));
        assert!(!resolver.used_fallback());
    }

    #[test]
    fn test_permission_denied_falls_back_once() {
        let probe = FakeProbe::denying(&["/readonly"]);
        let mut resolver = OutputResolver::with_probe(&probe);

        let first = resolver.resolve(Path::new("/readonly/sprites")).unwrap();
        assert_eq!(first.path, Path::new("/tmp-fake").join(FALLBACK_DIR_NAME));
        assert!(first.used_fallback);

        let probes_after_first = probe.probed.borrow().len();
        for _ in 0..3 {
            assert_eq!(resolver.resolve(Path::new("/readonly/sprites")).unwrap(), first);
        }
        assert_eq!(resolver.resolve(Path::new("elsewhere")).unwrap(), first);
        assert_eq!(probe.probed.borrow().len(), probes_after_first);
        assert_eq!(probes_after_first, 2);
    }

    #[test]
    fn test_process_wide_resolvers_share_the_first_answer() {
        let probe = FakeProbe::denying(&["/readonly"]);
        let mut first = OutputResolver::with_probe(&probe).shared();
        let mut second = OutputResolver::with_probe(&probe).shared();
        let mut private = OutputResolver::with_probe(&probe);

        let resolved = first.resolve(Path::new("/readonly/sprites")).unwrap();
        assert!(resolved.used_fallback);

        assert_eq!(second.resolve(Path::new("other_sprites")).unwrap(), resolved);
        assert!(second.used_fallback());
        assert_eq!(probe.probed.borrow().len(), 2);

        let own = private.resolve(Path::new("other_sprites")).unwrap();
        assert_eq!(own.path, PathBuf::from("other_sprites"));
    }

    #[test]
    fn test_unwritable_fallback_is_an_error() {
        let probe = FakeProbe {
            temp: PathBuf::from("/readonly/tmp"),
            ..FakeProbe::denying(&["/readonly"])
        };
        let mut resolver = OutputResolver::with_probe(&probe);
        let err = resolver.resolve(Path::new("/readonly/sprites")).unwrap_err();
        assert!(matches!(err, ForgeError::DirectoryUnwritable { .. }));
        assert!(resolver.resolved().is_none());
    }

    #[test]
    fn test_real_fs_creates_nested_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("a").join("b");
        let mut resolver = OutputResolver::new();
        let resolved = resolver.resolve(&target).unwrap();
        assert!(target.is_dir());
        assert_eq!(resolved.path, target);
        assert!(!target.join(".sprite_forge_probe").exists());
    }
}
