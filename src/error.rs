//! Error type.

use std::path::PathBuf;

use thiserror::Error;

/// Errors generated while evaluating or applying the module rules.
///
/// An unsupported target platform is deliberately *not* an error; see [`crate::layout::resolve`].
#[derive(Debug, Error)]
pub enum Error {
  #[error("Failed to get environment variable \"{name}\" !")]
  MissingEnvVar { name: &'static str },
  #[error("Target platform name must not be empty.")]
  InvalidPlatform,
  #[error("Path is not valid UTF-8: \"{}\"", path.display())]
  NonUtf8Path { path: PathBuf },
  #[error("I/O error on \"{}\": {source}", path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

impl Error {
  pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
    let path = path.into();
    move |source| Error::Io { path, source }
  }
}
