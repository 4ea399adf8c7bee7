use std::sync::Arc;

use crate::core::built_target::BuiltTarget;
use crate::core::error::CraftResult;
use crate::core::plan_context::PlanContext;

/// Index of a [`Target`] within a [`DefinitionContext`](crate::core::definition_context::DefinitionContext).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetId(pub usize);

/// `exec()` target fields (spec.md §3/§4.5).
#[derive(Debug, Clone, Default)]
pub struct ExecSpec {
    pub program: String,
    pub working_folder: String,
    pub args: Vec<String>,
    pub max_time_milliseconds: u64,
    pub log_output: bool,
    pub log_error: bool,
    pub log_name: Option<String>,
    pub ignore_fail: bool,
}

/// A generator for `ExternDynamicLibrary::library_path`, run at plan time
/// (spec.md §3 table; see also SPEC_FULL.md's "library_path as either a
/// literal path or a plan-time generator").
pub type LibraryPathFn = Arc<dyn Fn(&PlanContext) -> String + Send + Sync>;

#[derive(Clone)]
pub enum LibraryPath {
    Literal(String),
    Generated(LibraryPathFn),
}

impl std::fmt::Debug for LibraryPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LibraryPath::Literal(s) => write!(f, "LibraryPath::Literal({s:?})"),
            LibraryPath::Generated(_) => write!(f, "LibraryPath::Generated(..)"),
        }
    }
}

impl LibraryPath {
    pub fn resolve(&self, plan: &PlanContext) -> String {
        match self {
            LibraryPath::Literal(s) => s.clone(),
            LibraryPath::Generated(f) => f(plan),
        }
    }
}

/// A custom target's build closure (spec.md §3/§4.8).
pub type CustomBuildFn = Arc<dyn Fn(&mut PlanContext, TargetId) -> CraftResult<BuiltTarget> + Send + Sync>;

/// The kind-specific part of a target definition (spec.md §3's variant table).
#[derive(Clone)]
pub enum TargetKind {
    Program,
    StaticLibrary,
    DynamicLibrary,
    Object,
    ExternDynamicLibrary,
    Download { url: String },
    Unarchive { archive: String },
    Exec(ExecSpec),
    Custom(Option<CustomBuildFn>),
}

impl std::fmt::Debug for TargetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetKind::Program => write!(f, "Program"),
            TargetKind::StaticLibrary => write!(f, "StaticLibrary"),
            TargetKind::DynamicLibrary => write!(f, "DynamicLibrary"),
            TargetKind::Object => write!(f, "Object"),
            TargetKind::ExternDynamicLibrary => write!(f, "ExternDynamicLibrary"),
            TargetKind::Download { url } => write!(f, "Download({url:?})"),
            TargetKind::Unarchive { archive } => write!(f, "Unarchive({archive:?})"),
            TargetKind::Exec(spec) => write!(f, "Exec({spec:?})"),
            TargetKind::Custom(closure) => write!(f, "Custom(is_some={})", closure.is_some()),
        }
    }
}

/// A target definition: the fields common to every kind (spec.md §3),
/// plus the kind-specific ones in [`TargetKind`].
#[derive(Debug, Clone)]
pub struct Target {
    pub name: String,
    pub kind: TargetKind,
    pub sources: Vec<String>,
    pub includes: Vec<String>,
    pub uses: Vec<String>,
    pub export_includes: Vec<String>,
    pub export_library_options: Vec<String>,
    pub library_path: Option<LibraryPath>,
    pub is_default: bool,
}

impl Target {
    pub fn new(name: impl Into<String>, kind: TargetKind) -> Target {
        Target {
            name: name.into(),
            kind,
            sources: Vec::new(),
            includes: Vec::new(),
            uses: Vec::new(),
            export_includes: Vec::new(),
            export_library_options: Vec::new(),
            library_path: None,
            is_default: false,
        }
    }

    /// Whether this target's materialization depends on the current
    /// configuration (spec.md §3 table's rightmost column). `Download` and
    /// `Unarchive` are the only built-in kinds that aren't; custom targets
    /// are treated as sensitive, matching spec.md's "treat as yes unless
    /// the closure states otherwise".
    pub fn is_configuration_sensitive(&self) -> bool {
        !matches!(self.kind, TargetKind::Download { .. } | TargetKind::Unarchive { .. })
    }
}
