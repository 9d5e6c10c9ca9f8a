//! On-disk layout of the bundled _Live2D® Cubism SDK Core_ and per-platform library lookup.
//!
//! Expected layout, relative to the plugin's third-party root:
//!
//! ```text
//! Live2DCubismCore/include
//! Live2DCubismCore/lib/<os>/<arch>[/<toolset>]/<libfile>
//! Live2DCubismCore/dll/<os>[/<arch>]/<dllfile>
//! ```

use std::path::{Path, PathBuf};

use crate::platform::TargetPlatform;

const CORE_DIR_NAME: &str = "Live2DCubismCore";

/// Locations under `<plugin>/Source/ThirdParty`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThirdPartyLayout {
  root: PathBuf,
}

impl ThirdPartyLayout {
  pub fn from_plugin_dir(plugin_dir: impl AsRef<Path>) -> Self {
    Self {
      root: plugin_dir.as_ref().join("Source").join("ThirdParty"),
    }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }
  pub fn core_dir(&self) -> PathBuf {
    self.root.join(CORE_DIR_NAME)
  }
  pub fn include_dir(&self) -> PathBuf {
    self.core_dir().join("include")
  }

  /// Resolves the Core library record for `platform` under this layout.
  pub fn resolve(&self, platform: &TargetPlatform) -> Option<PlatformLibrary> {
    resolve(&self.core_dir(), platform)
  }
}

/// Where the Core library lives for one platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformLibrary {
  pub platform: TargetPlatform,
  /// Library search directory.
  pub lib_dir: PathBuf,
  /// Static or import library linked into the module.
  pub additional_library: PathBuf,
  /// Directory holding the shared library.
  pub runtime_dir: PathBuf,
  /// File name of the shared library.
  pub binary_name: &'static str,
}

impl PlatformLibrary {
  pub fn runtime_binary(&self) -> PathBuf {
    self.runtime_dir.join(self.binary_name)
  }
}

/// Looks up the Core library record for `platform` below `core_dir`.
///
/// Returns `None` for any platform without shipped binaries (including `Win32`);
/// nothing gets registered for such a platform and no error is raised.
pub fn resolve(core_dir: &Path, platform: &TargetPlatform) -> Option<PlatformLibrary> {
  let (lib_subdir, lib_file, runtime_subdir, binary_name): (&[&str], &[&str], &[&str], &'static str) =
    match platform {
      TargetPlatform::Win64 => (
        &["windows", "x86_64"],
        &["142", "Live2DCubismCore_MD.lib"],
        &["windows", "x86_64"],
        "Live2DCubismCore.dll",
      ),
      TargetPlatform::Mac => (
        &["macos", "x86_64"],
        &["libLive2DCubismCore.a"],
        &["macos"],
        "libLive2DCubismCore.dylib",
      ),
      TargetPlatform::Linux => (
        &["linux", "x86_64"],
        &["libLive2DCubismCore.a"],
        &["linux", "x86_64"],
        "libLive2DCubismCore.so",
      ),
      // Win32 binaries are no longer shipped with the plugin.
      TargetPlatform::Win32 | TargetPlatform::Other(_) => {
        log::debug!("No Cubism Core library registered for platform \"{}\".", platform);
        return None;
      }
    };

  let lib_dir = join_all(core_dir.join("lib"), lib_subdir);
  let additional_library = join_all(lib_dir.clone(), lib_file);
  let runtime_dir = join_all(core_dir.join("dll"), runtime_subdir);

  let library = PlatformLibrary {
    platform: platform.clone(),
    lib_dir,
    additional_library,
    runtime_dir,
    binary_name,
  };
  log::debug!("Resolved Cubism Core library for \"{}\": {:?}", platform, library);
  Some(library)
}

fn join_all(base: PathBuf, segments: &[&str]) -> PathBuf {
  segments.iter().fold(base, |path, segment| path.join(segment))
}
