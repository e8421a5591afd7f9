//! Resolution error types and diagnostics.

use std::path::PathBuf;

use thiserror::Error;

use crate::core::source::SourceError;
use crate::util::diagnostic::Diagnostic;

/// Error during dependency resolution.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("entry file `{entry}` is not part of the project")]
    EntryNotFound { entry: String },

    #[error("cyclic include detected: {}", cycle.join(" -> "))]
    CyclicDependency { cycle: Vec<String> },

    #[error("Library {name} not found")]
    LibraryNotFound {
        name: String,
        suggestions: Vec<String>,
    },

    #[error("error reading library repository `{}`: {message}", path.display())]
    Repository { path: PathBuf, message: String },
}

impl ResolveError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ResolveError::Source(err) => err.to_diagnostic(),

            ResolveError::EntryNotFound { entry } => {
                Diagnostic::error(format!("entry file `{}` was not submitted", entry))
                    .hint("Pass the entry .c file along with the other sources")
            }

            ResolveError::CyclicDependency { cycle } => {
                Diagnostic::error("cyclic include between project libraries")
                    .note(format!("cycle: {}", cycle.join(" -> ")))
                    .hint(
                        "Break the cycle by moving shared declarations into a separate header",
                    )
            }

            ResolveError::LibraryNotFound { name, suggestions } => {
                let mut diag =
                    Diagnostic::error(format!("could not find library `{}`", name));

                if !suggestions.is_empty() {
                    diag = diag.note(format!(
                        "directories matching `{}` without `{}.h`: {}",
                        name,
                        name,
                        suggestions.join(", ")
                    ));
                }

                diag.hint(format!(
                    "Check that `{}.h` is spelled correctly and exists in the library repository",
                    name
                ))
                .hint(format!(
                    "List `{}` under `repository.system-libraries` if the toolchain provides it",
                    name
                ))
            }

            ResolveError::Repository { path, message } => {
                Diagnostic::error(format!("cannot read library repository: {}", message))
                    .at(path)
                    .hint("Set `repository.root` or pass `--repository <dir>`")
            }
        }
    }
}
