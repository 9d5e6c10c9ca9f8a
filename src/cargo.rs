//! Publishing [`ModuleRules`] to Cargo from a build script.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use itertools::Itertools;

use crate::error::Error;
use crate::rules::{ModuleRules, TargetRules};

/// A single `cargo:` build script directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
  RustcLinkSearch(String),
  RustcLinkLib(String),
  RustcLinkArg(String),
  /// Exposed to dependents as `DEP_<links>_<KEY>`.
  Metadata { key: &'static str, value: String },
  RerunIfEnvChanged(&'static str),
  RerunIfChanged(String),
}

impl std::fmt::Display for Directive {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Directive::RustcLinkSearch(dir) => write!(f, "cargo:rustc-link-search=native={}", dir),
      Directive::RustcLinkLib(name) => write!(f, "cargo:rustc-link-lib=static={}", name),
      Directive::RustcLinkArg(arg) => write!(f, "cargo:rustc-link-arg={}", arg),
      Directive::Metadata { key, value } => write!(f, "cargo:{}={}", key, value),
      Directive::RerunIfEnvChanged(var) => write!(f, "cargo:rerun-if-env-changed={}", var),
      Directive::RerunIfChanged(path) => write!(f, "cargo:rerun-if-changed={}", path),
    }
  }
}

/// Ordered list of directives derived from a [`ModuleRules`].
#[derive(Debug, Clone, Default)]
pub struct CargoDirectives {
  directives: Vec<Directive>,
}

impl CargoDirectives {
  /// Fails if any registered path is not valid UTF-8.
  pub fn from_rules(rules: &ModuleRules) -> Result<Self, Error> {
    let mut directives: Vec<Directive> = TargetRules::env_vars()
      .iter()
      .map(|&var| Directive::RerunIfEnvChanged(var))
      .collect();

    // Prebuilt inputs; a replaced Core binary must rerun the build script.
    let watched = rules.public_additional_libraries
      .iter()
      .chain(rules.runtime_dependencies.iter().map(|dependency| &dependency.source));
    for path in watched {
      directives.push(Directive::RerunIfChanged(utf8_path(path)?));
    }

    // Additional libraries may sit below the search path (e.g. the `142` toolset directory).
    let search_dirs: Vec<&Path> = rules.public_system_library_paths
      .iter()
      .map(PathBuf::as_path)
      .chain(rules.public_additional_libraries.iter().filter_map(|lib| lib.parent()))
      .unique()
      .collect();
    for dir in search_dirs {
      directives.push(Directive::RustcLinkSearch(utf8_path(dir)?));
    }

    directives.extend(
      rules.public_additional_libraries
        .iter()
        .filter_map(|lib| link_name(lib))
        .map(Directive::RustcLinkLib),
    );

    if rules.platform.is_windows() {
      directives.extend(
        rules.public_delay_load_dlls
          .iter()
          .map(|dll| Directive::RustcLinkArg(format!("/DELAYLOAD:{}", dll))),
      );
    } else if !rules.public_delay_load_dlls.is_empty() {
      log::warn!(
        "Delay loading is not supported by the linker for this platform; ignoring {}.",
        rules.public_delay_load_dlls.iter().join(", "),
      );
    }

    for dir in &rules.public_include_paths {
      directives.push(Directive::Metadata { key: "include", value: utf8_path(dir)? });
    }

    Ok(Self { directives })
  }

  pub fn directives(&self) -> &[Directive] {
    &self.directives
  }

  pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
    for directive in &self.directives {
      writeln!(writer, "{}", directive)?;
    }
    Ok(())
  }

  /// Prints all directives to stdout, where Cargo picks them up.
  pub fn print(&self) -> io::Result<()> {
    self.write_to(io::stdout().lock())
  }
}

fn utf8_path(path: &Path) -> Result<String, Error> {
  path
    .to_str()
    .map(str::to_owned)
    .ok_or_else(|| Error::NonUtf8Path { path: path.to_owned() })
}

/// Library name for `rustc-link-lib`: `Live2DCubismCore_MD.lib` -> `Live2DCubismCore_MD`,
/// `libLive2DCubismCore.a` -> `Live2DCubismCore`.
fn link_name(library: &Path) -> Option<String> {
  let stem = library.file_stem()?.to_str()?;
  let is_msvc_lib = library.extension().map_or(false, |ext| ext.eq_ignore_ascii_case("lib"));
  let name = if is_msvc_lib { stem } else { stem.strip_prefix("lib").unwrap_or(stem) };
  Some(name.to_owned())
}
