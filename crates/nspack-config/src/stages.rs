//! Post-bundling stages (bundler plugins).
//!
//! The first eight stages are always present and always in the same order.
//! Optional stages are described by [`GATED_STAGES`], a list of gates checked
//! once per assembly and folded onto the end of the list, so enabling a
//! feature never shifts an existing stage.
//!
//! Most optional stages stand alone. The snapshot stage embeds the
//! configuration built without it, so that configuration (the base) already
//! carries every other open stage.

use std::path::PathBuf;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::config::BuildConfiguration;
use crate::entries::{BUNDLE_ENTRY, MAIN_SHEET, VENDOR_ENTRY};
use crate::environment::BuildEnvironment;
use crate::platform::Platform;
use crate::project::ProjectLayout;
use crate::rules::tsconfig_for;

/// Assets copied verbatim into the output directory
pub const COPY_GLOBS: [&str; 6] = [
    MAIN_SHEET,
    "css/**",
    "fonts/**",
    "**/*.jpg",
    "**/*.png",
    "**/*.xml",
];

pub const SNAPSHOT_TARGET_ARCHS: [&str; 3] = ["arm", "arm64", "ia32"];

/// Packages whose Java classes are generated into the snapshot
pub const SNAPSHOT_JAVA_PACKAGES: [&str; 1] = ["tns-core-modules"];

/// Directories the compiler plugin never scans
pub const COMPILER_IGNORE: [&str; 1] = ["App_Resources"];

/// Identifiers the mangler must leave alone: UI classes referenced by name
/// from XML markup.
pub const MANGLE_EXCLUDES: [&str; 38] = [
    "AbsoluteLayout",
    "ActionBar",
    "ActionItem",
    "ActivityIndicator",
    "Border",
    "Button",
    "ContentView",
    "DatePicker",
    "DockLayout",
    "FlexboxLayout",
    "FormattedString",
    "Frame",
    "GridLayout",
    "HtmlView",
    "Image",
    "Label",
    "ListPicker",
    "ListView",
    "NavigationButton",
    "Page",
    "Placeholder",
    "Progress",
    "Repeater",
    "ScrollView",
    "SearchBar",
    "SegmentedBar",
    "SegmentedBarItem",
    "Slider",
    "Span",
    "StackLayout",
    "Switch",
    "TabView",
    "TabViewItem",
    "TextField",
    "TextView",
    "TimePicker",
    "WebView",
    "WrapLayout",
];

/// Platform whose runtime breaks on compressed output
pub const COMPRESS_INCOMPATIBLE: Platform = Platform::Android;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "name", content = "options")]
pub enum BuildStage {
    #[serde(rename = "ExtractTextPlugin")]
    ExtractText(ExtractTextOptions),

    #[serde(rename = "CommonsChunkPlugin")]
    CommonsChunk(CommonsChunkOptions),

    #[serde(rename = "DefinePlugin")]
    Define(DefineOptions),

    #[serde(rename = "CopyWebpackPlugin")]
    CopyAssets(CopyAssetsOptions),

    #[serde(rename = "GenerateBundleStarterPlugin")]
    BundleStarter(BundleStarterOptions),

    #[serde(rename = "NativeScriptWorkerPlugin")]
    WorkerSupport(WorkerOptions),

    #[serde(rename = "BundleAnalyzerPlugin")]
    BundleAnalyzer(AnalyzerOptions),

    #[serde(rename = "NativeScriptAngularCompilerPlugin")]
    AngularCompiler(AngularCompilerOptions),

    #[serde(rename = "NativeScriptSnapshotPlugin")]
    Snapshot(Box<SnapshotOptions>),

    #[serde(rename = "LoaderOptionsPlugin")]
    LoaderOptions(LoaderOptionsOptions),

    #[serde(rename = "UglifyJsPlugin")]
    Uglify(UglifyOptions),
}

impl BuildStage {
    /// Plugin name as it appears on the wire
    pub fn name(&self) -> &'static str {
        match self {
            Self::ExtractText(_) => "ExtractTextPlugin",
            Self::CommonsChunk(_) => "CommonsChunkPlugin",
            Self::Define(_) => "DefinePlugin",
            Self::CopyAssets(_) => "CopyWebpackPlugin",
            Self::BundleStarter(_) => "GenerateBundleStarterPlugin",
            Self::WorkerSupport(_) => "NativeScriptWorkerPlugin",
            Self::BundleAnalyzer(_) => "BundleAnalyzerPlugin",
            Self::AngularCompiler(_) => "NativeScriptAngularCompilerPlugin",
            Self::Snapshot(_) => "NativeScriptSnapshotPlugin",
            Self::LoaderOptions(_) => "LoaderOptionsPlugin",
            Self::Uglify(_) => "UglifyJsPlugin",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractTextOptions {
    pub filename: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommonsChunkOptions {
    pub name: Vec<String>,
}

/// Global compile-time constants
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DefineOptions(pub IndexMap<String, Value>);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CopyPattern {
    pub from: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CopyAssetsOptions(pub Vec<CopyPattern>);

/// Modules the starter script requires, in load order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BundleStarterOptions(pub Vec<String>);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WorkerOptions {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzerOptions {
    pub analyzer_mode: String,
    pub open_analyzer: bool,
    pub generate_stats_file: bool,
    pub report_filename: PathBuf,
    pub stats_filename: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AngularCompilerOptions {
    pub entry_module: PathBuf,
    pub platform_options: PlatformOptions,
    pub ts_config_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformOptions {
    pub platform: Platform,
    pub platforms: Vec<Platform>,
    pub skip_code_generation: bool,
    pub ignore: Vec<String>,
}

/// Snapshot generator input.
///
/// `webpack_config` is the final configuration minus this stage, minify
/// stages included, so the generator replays the same bundling.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotOptions {
    pub chunk: String,
    pub project_root: PathBuf,
    pub webpack_config: BuildConfiguration,
    pub target_archs: Vec<String>,
    pub tns_java_classes_options: JavaClassesOptions,
    pub use_libs: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JavaClassesOptions {
    pub packages: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoaderOptionsOptions {
    pub minimize: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UglifyOptions {
    pub mangle: MangleOptions,
    pub compress: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MangleOptions {
    pub except: Vec<String>,
}

/// Condition that switches a group of optional stages on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageGate {
    Snapshot,
    Minify,
}

impl StageGate {
    pub fn is_open(self, env: &BuildEnvironment) -> bool {
        match self {
            Self::Snapshot => env.enable_snapshot,
            Self::Minify => env.enable_minify,
        }
    }
}

#[derive(Clone, Copy)]
enum StageBuilder {
    /// Depends only on the platform, environment and project
    Standalone(fn(&StageComposer<'_>) -> Vec<BuildStage>),
    /// Embeds the base configuration
    Embedding(fn(&StageComposer<'_>, &BuildConfiguration) -> Vec<BuildStage>),
}

/// Optional stages behind a gate.
#[derive(Clone, Copy)]
pub struct GatedStages {
    pub gate: StageGate,
    build: StageBuilder,
}

impl GatedStages {
    /// Whether the stages embed the base configuration.
    pub fn embeds_base(&self) -> bool {
        matches!(self.build, StageBuilder::Embedding(_))
    }
}

impl std::fmt::Debug for GatedStages {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatedStages")
            .field("gate", &self.gate)
            .field("embeds_base", &self.embeds_base())
            .finish_non_exhaustive()
    }
}

/// Optional stage groups in append order.
pub static GATED_STAGES: [GatedStages; 2] = [
    GatedStages {
        gate: StageGate::Snapshot,
        build: StageBuilder::Embedding(snapshot_stages),
    },
    GatedStages {
        gate: StageGate::Minify,
        build: StageBuilder::Standalone(minify_stages),
    },
];

/// Builds the stage list for one resolved platform and environment.
#[derive(Debug, Clone, Copy)]
pub struct StageComposer<'a> {
    platform: Platform,
    env: &'a BuildEnvironment,
    project: &'a ProjectLayout,
}

impl<'a> StageComposer<'a> {
    pub fn new(platform: Platform, env: &'a BuildEnvironment, project: &'a ProjectLayout) -> Self {
        Self {
            platform,
            env,
            project,
        }
    }

    /// Stages present in every configuration, in order.
    pub fn prefix(&self) -> Vec<BuildStage> {
        let skip_code_generation = self.env.skip_code_generation;

        let mut definitions = IndexMap::new();
        definitions.insert("global.TNS_WEBPACK".to_string(), Value::from("true"));
        definitions.insert(
            "global.skipCodeGeneration".to_string(),
            Value::from(skip_code_generation),
        );

        let report_dir = self.project.report_dir();

        vec![
            BuildStage::ExtractText(ExtractTextOptions {
                filename: MAIN_SHEET.to_string(),
            }),
            BuildStage::CommonsChunk(CommonsChunkOptions {
                name: vec![VENDOR_ENTRY.to_string()],
            }),
            BuildStage::Define(DefineOptions(definitions)),
            BuildStage::CopyAssets(CopyAssetsOptions(
                COPY_GLOBS
                    .iter()
                    .map(|glob| CopyPattern {
                        from: (*glob).to_string(),
                    })
                    .collect(),
            )),
            // Vendor must initialize before the application bundle.
            BuildStage::BundleStarter(BundleStarterOptions(vec![
                format!("./{VENDOR_ENTRY}"),
                format!("./{BUNDLE_ENTRY}"),
            ])),
            BuildStage::WorkerSupport(WorkerOptions::default()),
            BuildStage::BundleAnalyzer(AnalyzerOptions {
                analyzer_mode: "static".to_string(),
                open_analyzer: false,
                generate_stats_file: true,
                report_filename: report_dir.join("report.html"),
                stats_filename: report_dir.join("stats.json"),
            }),
            BuildStage::AngularCompiler(AngularCompilerOptions {
                entry_module: self.project.entry_module(),
                platform_options: PlatformOptions {
                    platform: self.platform,
                    platforms: Platform::ALL.to_vec(),
                    skip_code_generation,
                    ignore: to_strings(&COMPILER_IGNORE),
                },
                ts_config_path: tsconfig_for(self.env).to_string(),
            }),
        ]
    }

    fn open_gates(&self) -> impl Iterator<Item = &'static GatedStages> + '_ {
        GATED_STAGES
            .iter()
            .filter(|gated| gated.gate.is_open(self.env))
    }

    /// Stages of the base configuration: the prefix followed by every open
    /// stage that does not embed the base.
    pub fn base_stages(&self) -> Vec<BuildStage> {
        self.open_gates().fold(self.prefix(), |mut stages, gated| {
            if let StageBuilder::Standalone(build) = gated.build {
                stages.extend(build(self));
            }
            stages
        })
    }

    /// Optional stages for the open gates, in [`GATED_STAGES`] order.
    ///
    /// `base` is the configuration built from
    /// [`base_stages`](Self::base_stages); the snapshot stage embeds it.
    pub fn appended(&self, base: &BuildConfiguration) -> Vec<BuildStage> {
        self.open_gates().fold(Vec::new(), |mut stages, gated| {
            debug!(gate = ?gated.gate, "appending optional stages");
            match gated.build {
                StageBuilder::Standalone(build) => stages.extend(build(self)),
                StageBuilder::Embedding(build) => stages.extend(build(self, base)),
            }
            stages
        })
    }

    /// Full stage list: the fixed prefix followed by the optional stages.
    pub fn build_stages(&self, base: &BuildConfiguration) -> Vec<BuildStage> {
        let mut stages = self.prefix();
        stages.extend(self.appended(base));
        stages
    }
}

/// Stage list for `platform` and `env`, with optional stages built from `base`.
pub fn build_stages(
    platform: Platform,
    env: &BuildEnvironment,
    project: &ProjectLayout,
    base: &BuildConfiguration,
) -> Vec<BuildStage> {
    StageComposer::new(platform, env, project).build_stages(base)
}

fn snapshot_stages(composer: &StageComposer<'_>, base: &BuildConfiguration) -> Vec<BuildStage> {
    vec![BuildStage::Snapshot(Box::new(SnapshotOptions {
        chunk: VENDOR_ENTRY.to_string(),
        project_root: composer.project.root().to_path_buf(),
        webpack_config: base.clone(),
        target_archs: to_strings(&SNAPSHOT_TARGET_ARCHS),
        tns_java_classes_options: JavaClassesOptions {
            packages: to_strings(&SNAPSHOT_JAVA_PACKAGES),
        },
        use_libs: false,
    }))]
}

fn minify_stages(composer: &StageComposer<'_>) -> Vec<BuildStage> {
    vec![
        BuildStage::LoaderOptions(LoaderOptionsOptions { minimize: true }),
        BuildStage::Uglify(UglifyOptions {
            mangle: MangleOptions {
                except: to_strings(&MANGLE_EXCLUDES),
            },
            compress: composer.platform != COMPRESS_INCOMPATIBLE,
        }),
    ]
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| (*item).to_string()).collect()
}
