//! Module transform rules.
//!
//! Rules are evaluated in declaration order and the first rule whose test
//! matches (and whose exclude does not) decides the loader chain for a file.
//! [`RuleSet::first_match`] implements that contract directly so it can be
//! tested without a bundler.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::{json, Value};

use crate::entries::MAIN_SHEET;
use crate::environment::BuildEnvironment;

pub const RAW_LOADER: &str = "raw-loader";
pub const RESOLVE_URL_LOADER: &str = "resolve-url-loader";
pub const CSS_LOADER: &str = "nativescript-css-loader";
pub const PLATFORM_CSS_LOADER: &str = "nativescript-dev-webpack/platform-css-loader";
pub const SASS_LOADER: &str = "sass-loader";
pub const NGTOOLS_LOADER: &str = "@ngtools/webpack";

pub const TSCONFIG: &str = "tsconfig.json";
pub const TSCONFIG_AOT: &str = "tsconfig.aot.json";

/// Compiler config used by both the `.ts` rule and the compiler plugin.
pub fn tsconfig_for(env: &BuildEnvironment) -> &'static str {
    if env.skip_code_generation {
        TSCONFIG
    } else {
        TSCONFIG_AOT
    }
}

/// Predicate over a module path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchPattern {
    /// Path ends with `.<ext>` for any listed extension
    Extensions(Vec<String>),
    /// Final path component equals the name exactly
    File(String),
}

impl MatchPattern {
    pub fn extensions(exts: &[&str]) -> Self {
        Self::Extensions(exts.iter().map(|ext| (*ext).to_string()).collect())
    }

    pub fn file(name: impl Into<String>) -> Self {
        Self::File(name.into())
    }

    pub fn matches(&self, path: &str) -> bool {
        match self {
            Self::Extensions(exts) => exts
                .iter()
                .any(|ext| path.ends_with(&format!(".{ext}"))),
            Self::File(name) => file_name(path) == name,
        }
    }

    /// Regular expression source equivalent to [`matches`](Self::matches),
    /// as the bundler expects it in `test` and `exclude`.
    pub fn to_regex_source(&self) -> String {
        match self {
            Self::Extensions(exts) => exts
                .iter()
                .map(|ext| format!(r"\.{}$", escape_regex(ext)))
                .collect::<Vec<_>>()
                .join("|"),
            Self::File(name) => format!(r"(^|[\\/]){}$", escape_regex(name)),
        }
    }
}

impl Serialize for MatchPattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_regex_source())
    }
}

fn file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Characters with a meaning in a JavaScript `RegExp` source.
const REGEX_METACHARACTERS: &str = r"\^$.*+?()[]{}|/";

/// Escapes only syntax characters, so the source stays valid under the
/// `u` flag, which rejects identity escapes like `\-`.
fn escape_regex(literal: &str) -> String {
    let mut escaped = String::with_capacity(literal.len());
    for c in literal.chars() {
        if REGEX_METACHARACTERS.contains(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// One loader invocation in a chain.
#[derive(Debug, Clone, PartialEq)]
pub struct LoaderStep {
    pub loader: String,
    pub options: Option<Value>,
}

impl LoaderStep {
    pub fn new(loader: impl Into<String>) -> Self {
        Self {
            loader: loader.into(),
            options: None,
        }
    }

    pub fn with_options(loader: impl Into<String>, options: Value) -> Self {
        Self {
            loader: loader.into(),
            options: Some(options),
        }
    }
}

// Bare loaders serialize as a string, configured ones as `{ loader, options }`.
impl Serialize for LoaderStep {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.options {
            None => serializer.serialize_str(&self.loader),
            Some(options) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("loader", &self.loader)?;
                map.serialize_entry("options", options)?;
                map.end()
            }
        }
    }
}

/// Ordered loader chain. The bundler runs it last-to-first.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TransformChain {
    Steps(Vec<LoaderStep>),
    /// Output is captured by the stylesheet extraction stage instead of
    /// being inlined into the script bundle
    Extract { extract: Vec<LoaderStep> },
}

impl TransformChain {
    pub fn steps(&self) -> &[LoaderStep] {
        match self {
            Self::Steps(steps) => steps,
            Self::Extract { extract } => extract,
        }
    }

    pub fn is_extracted(&self) -> bool {
        matches!(self, Self::Extract { .. })
    }

    pub fn loader_names(&self) -> Vec<&str> {
        self.steps().iter().map(|step| step.loader.as_str()).collect()
    }
}

/// File category a rule handles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleCategory {
    Markup,
    MainStylesheet,
    Stylesheet,
    Sass,
    TypeScript,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransformRule {
    #[serde(skip)]
    pub category: RuleCategory,

    pub test: MatchPattern,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude: Option<MatchPattern>,

    #[serde(rename = "use")]
    pub chain: TransformChain,
}

impl TransformRule {
    pub fn applies_to(&self, path: &str) -> bool {
        self.test.matches(path)
            && !self
                .exclude
                .as_ref()
                .is_some_and(|exclude| exclude.matches(path))
    }
}

/// Rules in evaluation order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RuleSet(Vec<TransformRule>);

impl RuleSet {
    pub fn new(rules: Vec<TransformRule>) -> Self {
        Self(rules)
    }

    /// The rule that governs `path`: the first one that applies.
    ///
    /// # Example
    ///
    /// ```
    /// use nspack_config::{build_rules, BuildEnvironment, RuleCategory};
    ///
    /// let rules = build_rules(&BuildEnvironment::android());
    /// let rule = rules.first_match("styles/app.css").unwrap();
    /// assert_eq!(rule.category, RuleCategory::MainStylesheet);
    ///
    /// let rule = rules.first_match("components/button.css").unwrap();
    /// assert_eq!(rule.category, RuleCategory::Stylesheet);
    /// ```
    pub fn first_match(&self, path: &str) -> Option<&TransformRule> {
        self.0.iter().find(|rule| rule.applies_to(path))
    }

    /// Every rule that applies to `path`, in order.
    pub fn all_matches<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a TransformRule> {
        self.0.iter().filter(move |rule| rule.applies_to(path))
    }

    pub fn position(&self, category: RuleCategory) -> Option<usize> {
        self.0.iter().position(|rule| rule.category == category)
    }

    pub fn get(&self, category: RuleCategory) -> Option<&TransformRule> {
        self.0.iter().find(|rule| rule.category == category)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TransformRule> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Build the transform rules in evaluation order.
///
/// The root stylesheet rule must precede the generic `.css` rule, and the
/// generic rule excludes the root stylesheet so it is never processed twice.
pub fn build_rules(env: &BuildEnvironment) -> RuleSet {
    RuleSet::new(vec![
        TransformRule {
            category: RuleCategory::Markup,
            test: MatchPattern::extensions(&["html", "xml"]),
            exclude: None,
            chain: TransformChain::Steps(vec![LoaderStep::new(RAW_LOADER)]),
        },
        TransformRule {
            category: RuleCategory::MainStylesheet,
            test: MatchPattern::file(MAIN_SHEET),
            exclude: None,
            chain: TransformChain::Extract {
                extract: vec![
                    LoaderStep::with_options(RESOLVE_URL_LOADER, json!({ "silent": true })),
                    LoaderStep::with_options(CSS_LOADER, json!({ "minimize": false })),
                    LoaderStep::new(PLATFORM_CSS_LOADER),
                ],
            },
        },
        TransformRule {
            category: RuleCategory::Stylesheet,
            test: MatchPattern::extensions(&["css"]),
            exclude: Some(MatchPattern::file(MAIN_SHEET)),
            chain: TransformChain::Steps(vec![LoaderStep::new(RAW_LOADER)]),
        },
        TransformRule {
            category: RuleCategory::Sass,
            test: MatchPattern::extensions(&["scss"]),
            exclude: None,
            chain: TransformChain::Steps(vec![
                LoaderStep::new(RAW_LOADER),
                LoaderStep::new(RESOLVE_URL_LOADER),
                LoaderStep::new(SASS_LOADER),
            ]),
        },
        TransformRule {
            category: RuleCategory::TypeScript,
            test: MatchPattern::extensions(&["ts"]),
            exclude: None,
            chain: TransformChain::Steps(vec![LoaderStep::with_options(
                NGTOOLS_LOADER,
                json!({ "tsConfigPath": tsconfig_for(env) }),
            )]),
        },
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_order_is_fixed() {
        let rules = build_rules(&BuildEnvironment::android());
        let categories: Vec<_> = rules.iter().map(|rule| rule.category).collect();
        assert_eq!(
            categories,
            [
                RuleCategory::Markup,
                RuleCategory::MainStylesheet,
                RuleCategory::Stylesheet,
                RuleCategory::Sass,
                RuleCategory::TypeScript,
            ]
        );
    }

    #[test]
    fn generic_css_rule_excludes_main_sheet() {
        let rules = build_rules(&BuildEnvironment::android());
        let css = rules.get(RuleCategory::Stylesheet).unwrap();
        let exclude = css.exclude.as_ref().unwrap();
        assert!(exclude.matches("app.css"));
        assert!(!css.applies_to("app.css"));
        assert!(css.applies_to("views/home.css"));
    }

    #[test]
    fn main_sheet_pattern_is_exact_file_name() {
        let pattern = MatchPattern::file("app.css");
        assert!(pattern.matches("app.css"));
        assert!(pattern.matches("./app.css"));
        assert!(pattern.matches(r"C:\proj\app\app.css"));
        assert!(!pattern.matches("myapp.css"));
        assert!(!pattern.matches("app.css.map"));
    }

    #[test]
    fn sass_chain_keeps_raw_loader_outermost() {
        let rules = build_rules(&BuildEnvironment::ios());
        let sass = rules.get(RuleCategory::Sass).unwrap();
        assert_eq!(
            sass.chain.loader_names(),
            [RAW_LOADER, RESOLVE_URL_LOADER, SASS_LOADER]
        );
    }

    #[test]
    fn main_sheet_chain_is_extracted() {
        let rules = build_rules(&BuildEnvironment::ios());
        let main = rules.get(RuleCategory::MainStylesheet).unwrap();
        assert!(main.chain.is_extracted());
        assert_eq!(
            main.chain.loader_names(),
            [RESOLVE_URL_LOADER, CSS_LOADER, PLATFORM_CSS_LOADER]
        );
        assert_eq!(
            main.chain.steps()[1].options,
            Some(json!({ "minimize": false }))
        );
    }

    #[test]
    fn typescript_rule_follows_code_generation_flag() {
        let aot = build_rules(&BuildEnvironment::android());
        let jit = build_rules(&BuildEnvironment::android().with_skip_code_generation(true));

        let options = |rules: &RuleSet| {
            rules.get(RuleCategory::TypeScript).unwrap().chain.steps()[0]
                .options
                .clone()
        };
        assert_eq!(options(&aot), Some(json!({ "tsConfigPath": "tsconfig.aot.json" })));
        assert_eq!(options(&jit), Some(json!({ "tsConfigPath": "tsconfig.json" })));
    }

    #[test]
    fn escaping_touches_only_syntax_characters() {
        assert_eq!(escape_regex("app.css"), r"app\.css");
        assert_eq!(escape_regex("a+b(c)"), r"a\+b\(c\)");
        assert_eq!(escape_regex("my-app~v#2&x"), "my-app~v#2&x");
        assert_eq!(
            MatchPattern::file("theme-dark.css").to_regex_source(),
            r"(^|[\\/])theme-dark\.css$"
        );
    }

    #[test]
    fn unmatched_paths_have_no_rule() {
        let rules = build_rules(&BuildEnvironment::android());
        assert!(rules.first_match("images/logo.png").is_none());
        assert!(rules.first_match("vendor.js").is_none());
    }

    #[test]
    fn serializes_bundler_shape() {
        let rules = build_rules(&BuildEnvironment::android());
        let value = serde_json::to_value(&rules).unwrap();

        assert_eq!(value[0], json!({ "test": r"\.html$|\.xml$", "use": ["raw-loader"] }));
        assert_eq!(value[2]["exclude"], json!(r"(^|[\\/])app\.css$"));
        assert_eq!(
            value[1]["use"]["extract"][0],
            json!({ "loader": "resolve-url-loader", "options": { "silent": true } })
        );
        assert!(value[3].get("exclude").is_none());
    }
}
