//! Dynamic-library loading.

use std::fmt;
use std::path::{Path, PathBuf};

use libffi::middle::CodePtr;
use libloading::Library;
use tracing::debug;

use crate::FfiError;

/// An open dynamic library.
///
/// The underlying handle closes when the last owner drops this value;
/// prepared extern functions keep their library alive through shared
/// ownership at the evaluator level.
pub struct ForeignLibrary {
    inner: Library,
    path: PathBuf,
}

impl ForeignLibrary {
    /// Open a library by path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, FfiError> {
        let path = path.as_ref().to_path_buf();
        // SAFETY: loading a library runs its initializers; the caller
        // vouches for the library by naming it in a script.
        let inner = unsafe { Library::new(&path) }.map_err(|source| FfiError::LibraryOpen {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), "opened dynamic library");
        Ok(ForeignLibrary { inner, path })
    }

    /// Resolve a symbol to a callable code address.
    pub fn resolve(&self, symbol: &str) -> Result<CodePtr, FfiError> {
        // SAFETY: the resolved address is only invoked through a CIF
        // whose signature the script declared; a wrong declaration is
        // the script author's contract to uphold, as with dlsym.
        let sym = unsafe {
            self.inner
                .get::<unsafe extern "C" fn()>(symbol.as_bytes())
                .map_err(|source| FfiError::SymbolResolve {
                    symbol: symbol.to_string(),
                    source,
                })?
        };
        debug!(symbol, path = %self.path.display(), "resolved symbol");
        Ok(CodePtr::from_fun(*sym))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Debug for ForeignLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForeignLibrary")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}
