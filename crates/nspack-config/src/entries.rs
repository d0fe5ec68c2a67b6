//! Entry point selection.

use indexmap::IndexMap;
use tracing::debug;

use crate::environment::BuildEnvironment;

/// Name of the primary application bundle
pub const BUNDLE_ENTRY: &str = "bundle";

/// Name of the shared third-party dependency bundle
pub const VENDOR_ENTRY: &str = "vendor";

/// Root stylesheet, used both as a bundle name and as a file name
pub const MAIN_SHEET: &str = "app.css";

pub const JIT_MAIN: &str = "./main.ts";
pub const AOT_MAIN: &str = "./main.aot.ts";
pub const VENDOR_MODULE: &str = "./vendor";

/// Bundle name to entry module path. Iteration order is emission order.
pub type EntryMap = IndexMap<String, String>;

/// Path of the root stylesheet module, relative to the context root.
pub fn main_sheet_module() -> String {
    format!("./{MAIN_SHEET}")
}

/// Build the three entry points, in emission order.
///
/// # Example
///
/// ```
/// use nspack_config::{build_entries, BuildEnvironment};
///
/// let entries = build_entries(&BuildEnvironment::android());
/// let names: Vec<&str> = entries.keys().map(String::as_str).collect();
/// assert_eq!(names, ["bundle", "vendor", "app.css"]);
/// assert_eq!(entries["bundle"], "./main.aot.ts");
/// ```
pub fn build_entries(env: &BuildEnvironment) -> EntryMap {
    let main = if env.skip_code_generation {
        JIT_MAIN
    } else {
        AOT_MAIN
    };
    debug!(main, "selected application entry");

    let mut entries = EntryMap::with_capacity(3);
    entries.insert(BUNDLE_ENTRY.to_string(), main.to_string());
    entries.insert(VENDOR_ENTRY.to_string(), VENDOR_MODULE.to_string());
    entries.insert(MAIN_SHEET.to_string(), main_sheet_module());
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skip_code_generation_selects_jit_entry() {
        let env = BuildEnvironment::ios().with_skip_code_generation(true);
        assert_eq!(build_entries(&env)[BUNDLE_ENTRY], "./main.ts");
    }

    #[test]
    fn aot_is_the_default_entry() {
        let entries = build_entries(&BuildEnvironment::ios());
        assert_eq!(entries[BUNDLE_ENTRY], "./main.aot.ts");
    }

    #[test]
    fn vendor_and_stylesheet_do_not_depend_on_code_generation() {
        let aot = build_entries(&BuildEnvironment::android());
        let jit = build_entries(&BuildEnvironment::android().with_skip_code_generation(true));

        for key in [VENDOR_ENTRY, MAIN_SHEET] {
            assert_eq!(aot[key], jit[key]);
        }
        assert_eq!(aot[MAIN_SHEET], "./app.css");
        assert_eq!(aot[VENDOR_ENTRY], "./vendor");
    }
}
