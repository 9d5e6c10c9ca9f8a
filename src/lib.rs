//! # `live2d-cubism-core-build`
//!
//! Locates the prebuilt _Live2D® Cubism SDK Core_ bundled with a plugin and links it,
//! for use from the `build.rs` of a crate that calls into the Core.
//!
//! The bundled Core is expected under `<plugin>/Source/ThirdParty/Live2DCubismCore`.
//! Supported platforms are `Win64`, `Mac` and `Linux`; for any other platform nothing is linked.
//!
//! ## Usage
//!
//! ```toml
//! [build-dependencies]
//! live2d-cubism-core-build = "0.1"
//! ```
//!
//! ```no_run
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!   let rules = live2d_cubism_core_build::activate()?;
//!
//!   let out_dir = std::path::PathBuf::from(std::env::var("OUT_DIR")?);
//!   live2d_cubism_core_build::stage_runtime_dependencies(&rules, &out_dir)?;
//!   Ok(())
//! }
//! ```
//!
//! ## Environment
//! - `LIVE2D_CUBISM_PLUGIN_DIR`: plugin root. Defaults to `CARGO_MANIFEST_DIR`.
//! - `LIVE2D_CUBISM_TARGET_PLATFORM`: `Win64`, `Win32`, `Mac` or `Linux`. Defaults to the Cargo target.

pub mod cargo;
pub mod error;
pub mod layout;
pub mod platform;
pub mod rules;
pub mod runtime;

pub use cargo::{CargoDirectives, Directive};
pub use error::Error;
pub use layout::{PlatformLibrary, ThirdPartyLayout};
pub use platform::TargetPlatform;
pub use rules::{ModuleName, ModuleRules, PchUsageMode, RuntimeDependency, TargetRules};
pub use runtime::stage_runtime_dependencies;

/// Evaluates the module rules for the current build target and prints the Cargo directives.
pub fn activate() -> Result<ModuleRules, Error> {
  let target = TargetRules::from_env()?;
  log::debug!("Evaluating Cubism Core build rules for {:?}", target);

  let rules = ModuleRules::new(&target);
  CargoDirectives::from_rules(&rules)?
    .print()
    .map_err(Error::io("<stdout>"))?;

  Ok(rules)
}
