//! The fluent target-definition surface (spec.md §4.1): `ctx.program("app")
//! .source("main.cpp").use("util")`, etc.
//!
//! Each target kind gets its own zero-sized marker so the kind-specific
//! setters (`.program()` on an exec target, `.url()` on a download) are
//! only available on the handle kind that actually has them, the way the
//! original's `ExecTarget&`/`DownloadTarget&` subtypes did.

use std::marker::PhantomData;
use std::sync::Arc;

use crate::core::definition_context::DefinitionContext;
use crate::core::target::{CustomBuildFn, LibraryPath, LibraryPathFn, TargetId};

pub struct ProgramKind;
pub struct StaticLibraryKind;
pub struct DynamicLibraryKind;
pub struct ObjectKind;
pub struct ExternDynamicLibraryKind;
pub struct DownloadKind;
pub struct UnarchiveKind;
pub struct ExecKind;
pub struct CustomKind;

/// A chainable handle onto a target being defined. `K` pins which
/// kind-specific methods (in the impl blocks below) apply.
pub struct Handle<'a, K> {
    pub(crate) ctx: &'a mut DefinitionContext,
    pub(crate) id: TargetId,
    pub(crate) _kind: PhantomData<K>,
}

impl<'a, K> Handle<'a, K> {
    pub(crate) fn new(ctx: &'a mut DefinitionContext, id: TargetId) -> Self {
        Handle { ctx, id, _kind: PhantomData }
    }

    pub fn id(&self) -> TargetId {
        self.id
    }

    fn target_mut(&mut self) -> &mut crate::core::target::Target {
        &mut self.ctx.targets[self.id.0]
    }

    /// Add a whitespace-delimited list of source files.
    pub fn source(mut self, files: impl Into<String>) -> Self {
        self.target_mut().sources.push(files.into());
        self
    }

    /// Add a whitespace-delimited list of private include paths.
    pub fn include(mut self, paths: impl Into<String>) -> Self {
        self.target_mut().includes.push(paths.into());
        self
    }

    /// Add a whitespace-delimited list of target names this target depends on.
    pub fn uses(mut self, names: impl Into<String>) -> Self {
        self.target_mut().uses.push(names.into());
        self
    }

    /// Add a whitespace-delimited list of include paths exported to
    /// whichever targets `use` this one.
    pub fn export_include(mut self, paths: impl Into<String>) -> Self {
        self.target_mut().export_includes.push(paths.into());
        self
    }

    /// Add a whitespace-delimited list of linker options exported to
    /// whichever targets `use` this one.
    pub fn export_library_options(mut self, options: impl Into<String>) -> Self {
        self.target_mut().export_library_options.push(options.into());
        self
    }

    pub fn is_default(mut self, enabled: bool) -> Self {
        self.target_mut().is_default = enabled;
        self
    }
}

impl<'a> Handle<'a, ExternDynamicLibraryKind> {
    /// A literal, already-known library path.
    pub fn library_path(mut self, path: impl Into<String>) -> Self {
        self.target_mut().library_path = Some(LibraryPath::Literal(path.into()));
        self
    }

    /// A library path computed from the plan context once planning starts.
    pub fn library_path_fn(
        mut self,
        generator: impl Fn(&crate::core::plan_context::PlanContext) -> String + Send + Sync + 'static,
    ) -> Self {
        let generator: LibraryPathFn = Arc::new(generator);
        self.target_mut().library_path = Some(LibraryPath::Generated(generator));
        self
    }
}

impl<'a> Handle<'a, DownloadKind> {
    pub fn url(mut self, url: impl Into<String>) -> Self {
        if let crate::core::target::TargetKind::Download { url: slot } = &mut self.target_mut().kind {
            *slot = url.into();
        }
        self
    }
}

impl<'a> Handle<'a, UnarchiveKind> {
    /// Name of the `download` (or other) target whose output is the archive.
    pub fn archive(mut self, target_name: impl Into<String>) -> Self {
        if let crate::core::target::TargetKind::Unarchive { archive } = &mut self.target_mut().kind {
            *archive = target_name.into();
        }
        self
    }
}

impl<'a> Handle<'a, ExecKind> {
    pub fn program(mut self, path: impl Into<String>) -> Self {
        self.with_exec(|spec| spec.program = path.into())
    }

    pub fn working_folder(mut self, path: impl Into<String>) -> Self {
        self.with_exec(|spec| spec.working_folder = path.into())
    }

    pub fn args(mut self, args: impl Into<String>) -> Self {
        self.with_exec(|spec| spec.args.push(args.into()))
    }

    pub fn max_time(mut self, milliseconds: u64) -> Self {
        self.with_exec(|spec| spec.max_time_milliseconds = milliseconds)
    }

    pub fn log_output(mut self, enabled: bool) -> Self {
        self.with_exec(|spec| spec.log_output = enabled)
    }

    pub fn log_error(mut self, enabled: bool) -> Self {
        self.with_exec(|spec| spec.log_error = enabled)
    }

    pub fn log_name(mut self, name: impl Into<String>) -> Self {
        self.with_exec(|spec| spec.log_name = Some(name.into()))
    }

    pub fn ignore_fail(mut self, enabled: bool) -> Self {
        self.with_exec(|spec| spec.ignore_fail = enabled)
    }

    fn with_exec(mut self, f: impl FnOnce(&mut crate::core::target::ExecSpec)) -> Self {
        if let crate::core::target::TargetKind::Exec(spec) = &mut self.target_mut().kind {
            f(spec);
        }
        self
    }
}

impl<'a> Handle<'a, CustomKind> {
    /// Supply the closure that performs this target's own materialization
    /// (spec.md §4.8). Without one, the target is a pure synchronization
    /// point over its `uses`.
    pub fn build_with(
        mut self,
        closure: impl Fn(&mut crate::core::plan_context::PlanContext, TargetId) -> crate::core::error::CraftResult<crate::core::built_target::BuiltTarget>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        let closure: CustomBuildFn = Arc::new(closure);
        self.target_mut().kind = crate::core::target::TargetKind::Custom(Some(closure));
        self
    }
}
