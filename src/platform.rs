//! Target platform identifier.

use derive_more::Display;

use crate::error::Error;

/// Platform the module is being built for, as named by the host build tool.
#[derive(Debug, Display, Clone, PartialEq, Eq, Hash)]
pub enum TargetPlatform {
  #[display(fmt = "Win64")]
  Win64,
  /// Recognized, but no Core binaries are registered for it.
  #[display(fmt = "Win32")]
  Win32,
  #[display(fmt = "Mac")]
  Mac,
  #[display(fmt = "Linux")]
  Linux,
  /// Any platform outside the fixed set. Carries the raw name.
  #[display(fmt = "{}", _0)]
  Other(String),
}

impl TargetPlatform {
  /// Parses a host platform name (`Win64`, `Win32`, `Mac`, `Linux`), ignoring case.
  pub fn from_host_name(name: &str) -> Result<Self, Error> {
    let name = name.trim();
    if name.is_empty() {
      return Err(Error::InvalidPlatform);
    }

    let platform = match name.to_ascii_lowercase().as_str() {
      "win64" => TargetPlatform::Win64,
      "win32" => TargetPlatform::Win32,
      "mac" => TargetPlatform::Mac,
      "linux" => TargetPlatform::Linux,
      _ => TargetPlatform::Other(name.to_owned()),
    };
    Ok(platform)
  }

  /// Maps Cargo's `CARGO_CFG_TARGET_OS` / `CARGO_CFG_TARGET_ARCH` pair.
  pub fn from_cargo_cfg(target_os: &str, target_arch: &str) -> Self {
    match (target_os, target_arch) {
      ("windows", "x86_64") => TargetPlatform::Win64,
      ("windows", "x86") => TargetPlatform::Win32,
      ("macos", _) => TargetPlatform::Mac,
      ("linux", "x86_64") => TargetPlatform::Linux,
      (os, arch) => TargetPlatform::Other(format!("{os}-{arch}")),
    }
  }

  pub fn is_windows(&self) -> bool {
    matches!(self, TargetPlatform::Win64 | TargetPlatform::Win32)
  }
}

impl std::str::FromStr for TargetPlatform {
  type Err = Error;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::from_host_name(s)
  }
}
