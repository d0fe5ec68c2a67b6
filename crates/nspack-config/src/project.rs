//! Project directory layout.
//!
//! Every absolute path in an assembled configuration is derived here from
//! the project root. Nothing touches the filesystem.

use std::path::{Path, PathBuf};

use crate::platform::Platform;

/// Directory holding the application sources, relative to the project root
pub const APP_DIR: &str = "app";

/// Directory receiving the bundle analyzer output
pub const REPORT_DIR: &str = "report";

/// Root module handed to the Angular compiler plugin, relative to the project root
pub const ENTRY_MODULE: &str = "app/app.module#AppModule";

const ANDROID_APP_PATH: &str = "platforms/android/src/main/assets/app";

/// Layout of a NativeScript project rooted at a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    root: PathBuf,
}

impl ProjectLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/app`, the context every entry is resolved against
    pub fn context_root(&self) -> PathBuf {
        self.root.join(APP_DIR)
    }

    /// Where the native project expects the bundled app for `platform`.
    ///
    /// iOS nests the app under a directory named after the project, stripped
    /// of every character that is not an ASCII letter or digit.
    ///
    /// # Example
    ///
    /// ```
    /// use nspack_config::{Platform, ProjectLayout};
    /// use std::path::PathBuf;
    ///
    /// let project = ProjectLayout::new("/work/my-app");
    /// assert_eq!(
    ///     project.app_output_path(Platform::Ios),
    ///     PathBuf::from("/work/my-app/platforms/ios/myapp/app")
    /// );
    /// ```
    pub fn app_output_path(&self, platform: Platform) -> PathBuf {
        match platform {
            Platform::Android => self.root.join(ANDROID_APP_PATH),
            Platform::Ios => self
                .root
                .join("platforms")
                .join("ios")
                .join(self.sanitized_name())
                .join("app"),
        }
    }

    pub fn sanitized_name(&self) -> String {
        self.root
            .file_name()
            .map(|name| {
                name.to_string_lossy()
                    .chars()
                    .filter(char::is_ascii_alphanumeric)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn report_dir(&self) -> PathBuf {
        self.root.join(REPORT_DIR)
    }

    pub fn entry_module(&self) -> PathBuf {
        self.root.join(ENTRY_MODULE)
    }

    pub fn tsconfig_path(&self, file_name: &str) -> PathBuf {
        self.root.join(file_name)
    }
}
