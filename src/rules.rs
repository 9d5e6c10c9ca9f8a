//! Build rules of the Cubism framework module.

use std::path::{Path, PathBuf};

use shrinkwraprs::Shrinkwrap;
use derive_more::Display;
use static_assertions::assert_impl_all;

use crate::error::Error;
use crate::layout::ThirdPartyLayout;
use crate::platform::TargetPlatform;

/// Plugin root directory. Falls back to `CARGO_MANIFEST_DIR`.
pub const PLUGIN_DIR_ENV: &str = "LIVE2D_CUBISM_PLUGIN_DIR";
/// Host platform name (`Win64`, `Mac`, ...), overriding the Cargo target.
pub const TARGET_PLATFORM_ENV: &str = "LIVE2D_CUBISM_TARGET_PLATFORM";

const MANIFEST_DIR_ENV: &str = "CARGO_MANIFEST_DIR";
const TARGET_OS_ENV: &str = "CARGO_CFG_TARGET_OS";
const TARGET_ARCH_ENV: &str = "CARGO_CFG_TARGET_ARCH";

/// Placeholder for the build output directory in runtime dependency targets.
pub const TARGET_OUTPUT_DIR: &str = "$(TargetOutputDir)";

const PRIVATE_DEPENDENCY_MODULE_NAMES: [&str; 7] = [
  "Core",
  "CoreUObject",
  "Engine",
  "Projects",
  "Renderer",
  "RenderCore",
  "RHI",
];

/// Read-only description of the build target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetRules {
  pub platform: TargetPlatform,
  pub plugin_dir: PathBuf,
}

impl TargetRules {
  pub fn new(platform: TargetPlatform, plugin_dir: impl Into<PathBuf>) -> Self {
    Self {
      platform,
      plugin_dir: plugin_dir.into(),
    }
  }

  /// Reads the target from the build script environment.
  pub fn from_env() -> Result<Self, Error> {
    Self::from_vars(|name| std::env::var(name).ok())
  }

  /// Same as [`TargetRules::from_env`], with variables supplied by `lookup`.
  pub fn from_vars<F>(lookup: F) -> Result<Self, Error>
  where
    F: Fn(&'static str) -> Option<String>,
  {
    let require = |name: &'static str| lookup(name).ok_or(Error::MissingEnvVar { name });

    let plugin_dir = match lookup(PLUGIN_DIR_ENV) {
      Some(dir) => dir,
      None => require(MANIFEST_DIR_ENV)?,
    };

    let platform = match lookup(TARGET_PLATFORM_ENV) {
      Some(name) => TargetPlatform::from_host_name(&name)?,
      None => TargetPlatform::from_cargo_cfg(&require(TARGET_OS_ENV)?, &require(TARGET_ARCH_ENV)?),
    };

    Ok(Self::new(platform, plugin_dir))
  }

  /// Variables consulted by [`TargetRules::from_vars`].
  pub fn env_vars() -> &'static [&'static str] {
    &[PLUGIN_DIR_ENV, TARGET_PLATFORM_ENV, MANIFEST_DIR_ENV, TARGET_OS_ENV, TARGET_ARCH_ENV]
  }
}

/// Name of a host engine module.
#[derive(Debug, Display, Clone, PartialEq, Eq, Hash, Shrinkwrap)]
pub struct ModuleName(String);

impl From<&str> for ModuleName {
  fn from(name: &str) -> Self {
    Self(name.to_owned())
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PchUsageMode {
  UseExplicitOrSharedPchs,
}

/// Copy rule for a shared library needed at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeDependency {
  /// Destination; may start with [`TARGET_OUTPUT_DIR`].
  pub target: String,
  pub source: PathBuf,
}

impl RuntimeDependency {
  /// Destination with [`TARGET_OUTPUT_DIR`] replaced by `target_output_dir`.
  pub fn target_path(&self, target_output_dir: &Path) -> PathBuf {
    match self.target.strip_prefix(TARGET_OUTPUT_DIR) {
      Some(rest) => target_output_dir.join(rest.trim_start_matches(['/', '\\'])),
      None => PathBuf::from(&self.target),
    }
  }
}

/// Registries populated for the module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleRules {
  /// Platform the rules were evaluated for.
  pub platform: TargetPlatform,

  pub pch_usage: PchUsageMode,
  pub use_unity: bool,

  pub public_include_paths: Vec<PathBuf>,
  pub private_include_paths: Vec<PathBuf>,

  pub public_dependency_module_names: Vec<ModuleName>,
  pub private_dependency_module_names: Vec<ModuleName>,
  pub dynamically_loaded_module_names: Vec<ModuleName>,

  pub public_system_library_paths: Vec<PathBuf>,
  pub public_additional_libraries: Vec<PathBuf>,
  pub public_delay_load_dlls: Vec<String>,
  pub runtime_dependencies: Vec<RuntimeDependency>,
}

assert_impl_all!(ModuleRules: Send, Sync);

impl ModuleRules {
  /// Evaluates the rules for `target`.
  pub fn new(target: &TargetRules) -> Self {
    let layout = ThirdPartyLayout::from_plugin_dir(&target.plugin_dir);

    let mut rules = Self {
      platform: target.platform.clone(),
      pch_usage: PchUsageMode::UseExplicitOrSharedPchs,
      use_unity: false,
      public_include_paths: vec![layout.include_dir()],
      private_include_paths: Vec::new(),
      public_dependency_module_names: Vec::new(),
      private_dependency_module_names: PRIVATE_DEPENDENCY_MODULE_NAMES.iter().map(|&name| name.into()).collect(),
      dynamically_loaded_module_names: Vec::new(),
      public_system_library_paths: Vec::new(),
      public_additional_libraries: Vec::new(),
      public_delay_load_dlls: Vec::new(),
      runtime_dependencies: Vec::new(),
    };

    if let Some(library) = layout.resolve(&target.platform) {
      rules.public_system_library_paths.push(library.lib_dir.clone());
      rules.public_additional_libraries.push(library.additional_library.clone());
      rules.public_delay_load_dlls.push(library.binary_name.to_owned());
      rules.runtime_dependencies.push(RuntimeDependency {
        target: format!("{}/{}", TARGET_OUTPUT_DIR, library.binary_name),
        source: library.runtime_binary(),
      });
    }

    rules
  }
}

#[cfg(test)]
mod tests {
  use std::collections::HashMap;

  use super::*;

  fn rules_for(platform: TargetPlatform) -> ModuleRules {
    ModuleRules::new(&TargetRules::new(platform, "/plugin"))
  }

  #[test]
  fn common_registries_do_not_depend_on_platform() {
    let rules = rules_for(TargetPlatform::Linux);

    assert_eq!(rules.pch_usage, PchUsageMode::UseExplicitOrSharedPchs);
    assert!(!rules.use_unity);
    assert_eq!(
      rules.public_include_paths,
      vec![PathBuf::from("/plugin/Source/ThirdParty/Live2DCubismCore/include")],
    );
    assert!(rules.private_include_paths.is_empty());
    assert!(rules.public_dependency_module_names.is_empty());
    assert!(rules.dynamically_loaded_module_names.is_empty());

    let names: Vec<&str> = rules.private_dependency_module_names.iter().map(|n| n.as_str()).collect();
    assert_eq!(names, ["Core", "CoreUObject", "Engine", "Projects", "Renderer", "RenderCore", "RHI"]);
  }

  #[test]
  fn linux_registers_one_of_each() {
    let rules = rules_for(TargetPlatform::Linux);
    let core = PathBuf::from("/plugin/Source/ThirdParty/Live2DCubismCore");

    assert_eq!(rules.public_system_library_paths, vec![core.join("lib/linux/x86_64")]);
    assert_eq!(rules.public_additional_libraries, vec![core.join("lib/linux/x86_64/libLive2DCubismCore.a")]);
    assert_eq!(rules.public_delay_load_dlls, vec!["libLive2DCubismCore.so".to_owned()]);
    assert_eq!(
      rules.runtime_dependencies,
      vec![RuntimeDependency {
        target: "$(TargetOutputDir)/libLive2DCubismCore.so".to_owned(),
        source: core.join("dll/linux/x86_64/libLive2DCubismCore.so"),
      }],
    );
  }

  #[test]
  fn win64_delay_loads_dll() {
    let rules = rules_for(TargetPlatform::Win64);
    assert_eq!(rules.public_delay_load_dlls, vec!["Live2DCubismCore.dll".to_owned()]);
    assert!(rules.public_additional_libraries[0].ends_with("142/Live2DCubismCore_MD.lib"));
  }

  #[test]
  fn unsupported_platforms_register_nothing() {
    for platform in [TargetPlatform::Win32, TargetPlatform::Other("PS5".to_owned())] {
      let rules = rules_for(platform.clone());
      assert!(rules.public_system_library_paths.is_empty());
      assert!(rules.public_additional_libraries.is_empty());
      assert!(rules.public_delay_load_dlls.is_empty());
      assert!(rules.runtime_dependencies.is_empty());
      assert_eq!(rules.platform, platform);
      // Include paths and module dependencies are still declared.
      assert_eq!(rules.public_include_paths.len(), 1);
      assert_eq!(rules.private_dependency_module_names.len(), 7);
    }
  }

  #[test]
  fn runtime_target_expands_output_dir() {
    let dependency = RuntimeDependency {
      target: "$(TargetOutputDir)/Live2DCubismCore.dll".to_owned(),
      source: PathBuf::from("unused"),
    };
    assert_eq!(dependency.target_path(Path::new("/out")), PathBuf::from("/out/Live2DCubismCore.dll"));

    let absolute = RuntimeDependency {
      target: "/elsewhere/lib.so".to_owned(),
      source: PathBuf::from("unused"),
    };
    assert_eq!(absolute.target_path(Path::new("/out")), PathBuf::from("/elsewhere/lib.so"));
  }

  #[test]
  fn target_from_vars_prefers_explicit_settings() {
    let vars: HashMap<&str, &str> = [
      (PLUGIN_DIR_ENV, "/plugin"),
      (TARGET_PLATFORM_ENV, "Mac"),
      (MANIFEST_DIR_ENV, "/manifest"),
      (TARGET_OS_ENV, "linux"),
      (TARGET_ARCH_ENV, "x86_64"),
    ]
    .into_iter()
    .collect();

    let target = TargetRules::from_vars(|name| vars.get(name).map(|v| v.to_string())).unwrap();
    assert_eq!(target, TargetRules::new(TargetPlatform::Mac, "/plugin"));
  }

  #[test]
  fn target_from_vars_falls_back_to_cargo() {
    let vars: HashMap<&str, &str> = [
      (MANIFEST_DIR_ENV, "/manifest"),
      (TARGET_OS_ENV, "windows"),
      (TARGET_ARCH_ENV, "x86_64"),
    ]
    .into_iter()
    .collect();

    let target = TargetRules::from_vars(|name| vars.get(name).map(|v| v.to_string())).unwrap();
    assert_eq!(target, TargetRules::new(TargetPlatform::Win64, "/manifest"));
  }

  #[test]
  fn target_from_vars_reports_missing_variable() {
    let err = TargetRules::from_vars(|name| (name == MANIFEST_DIR_ENV).then(|| "/m".to_owned())).unwrap_err();
    assert!(matches!(err, Error::MissingEnvVar { name: TARGET_OS_ENV }));
  }
}
