//! Staging of runtime dependencies next to the build output.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::rules::ModuleRules;

/// Copies every runtime dependency of `rules` into `target_output_dir`.
///
/// Returns the staged paths, in registration order.
pub fn stage_runtime_dependencies(rules: &ModuleRules, target_output_dir: &Path) -> Result<Vec<PathBuf>, Error> {
  if rules.runtime_dependencies.is_empty() {
    return Ok(Vec::new());
  }

  let mut staged = Vec::with_capacity(rules.runtime_dependencies.len());
  for dependency in &rules.runtime_dependencies {
    let target = dependency.target_path(target_output_dir);
    if let Some(parent) = target.parent() {
      fs::create_dir_all(parent).map_err(Error::io(parent))?;
    }
    fs::copy(&dependency.source, &target).map_err(Error::io(&dependency.source))?;

    log::info!("Staged \"{}\" -> \"{}\"", dependency.source.display(), target.display());
    staged.push(target);
  }
  Ok(staged)
}
