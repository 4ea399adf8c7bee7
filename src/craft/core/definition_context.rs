use std::collections::HashMap;
use std::path::{Path, PathBuf};

use craft_log::Kernel;
use craft_platform::{Os, Platform};

use crate::core::compiler::Toolchain;
use crate::core::configuration::Configuration;
use crate::core::handle::{
    CustomKind, DownloadKind, DynamicLibraryKind, ExecKind, ExternDynamicLibraryKind, Handle, ObjectKind,
    ProgramKind, StaticLibraryKind, UnarchiveKind,
};
use crate::core::target::{ExecSpec, Target, TargetId, TargetKind};

/// The registry of targets, available configurations and the chosen
/// host/target platforms and toolchain (spec.md §2.5). Populated by a
/// craftfile's `craft(&mut DefinitionContext)` entry point; read-only
/// from then on.
pub struct DefinitionContext {
    pub(crate) targets: Vec<Target>,
    names: HashMap<String, TargetId>,
    configurations: Vec<Configuration>,
    default_configurations: Vec<String>,
    platforms: Vec<Platform>,
    host_platform: Platform,
    target_platform: Platform,
    toolchain: Toolchain,
    workspace: PathBuf,
    build_root: PathBuf,
    kernel: Kernel,
}

impl DefinitionContext {
    pub fn new(workspace: impl Into<PathBuf>, kernel: Kernel) -> DefinitionContext {
        let host_platform = Platform::host();
        let toolchain = if matches!(host_platform.os, Os::Windows) {
            Toolchain::Msvc
        } else {
            Toolchain::Gcc
        };
        let target_platform = Platform::host();
        let workspace = workspace.into();

        DefinitionContext {
            targets: Vec::new(),
            names: HashMap::new(),
            configurations: Configuration::builtins(),
            default_configurations: vec![Configuration::DEFAULT.to_string()],
            platforms: Platform::builtins(),
            host_platform,
            target_platform,
            toolchain,
            build_root: workspace.join("build"),
            workspace,
            kernel,
        }
    }

    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    /// Directory the craftfile was loaded from; source paths are resolved
    /// relative to it.
    pub fn workspace(&self) -> &Path {
        &self.workspace
    }

    pub fn build_root(&self) -> &Path {
        &self.build_root
    }

    pub fn host_platform(&self) -> &Platform {
        &self.host_platform
    }

    pub fn target_platform(&self) -> &Platform {
        &self.target_platform
    }

    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    pub fn toolchain(&self) -> Toolchain {
        self.toolchain
    }

    pub fn configurations(&self) -> &[Configuration] {
        &self.configurations
    }

    pub fn default_configurations(&self) -> &[String] {
        &self.default_configurations
    }

    pub fn set_default_configurations(&mut self, names: Vec<String>) {
        self.default_configurations = names;
    }

    pub fn register_configuration(&mut self, configuration: Configuration) {
        self.configurations.push(configuration);
    }

    pub fn has_configuration(&self, name: &str) -> bool {
        self.configurations.iter().any(|c| c.name == name)
    }

    pub fn get_configuration(&self, name: &str) -> Option<&Configuration> {
        self.configurations.iter().find(|c| c.name == name)
    }

    pub fn get_target_id(&self, name: &str) -> Option<TargetId> {
        self.names.get(name).copied()
    }

    pub fn get_target(&self, name: &str) -> Option<&Target> {
        self.get_target_id(name).map(|id| &self.targets[id.0])
    }

    pub fn target_by_id(&self, id: TargetId) -> &Target {
        &self.targets[id.0]
    }

    pub fn targets(&self) -> impl Iterator<Item = (TargetId, &Target)> {
        self.targets.iter().enumerate().map(|(i, t)| (TargetId(i), t))
    }

    /// Targets registered with `.is_default(true)`.
    pub fn get_default_targets(&self) -> Vec<TargetId> {
        self.targets()
            .filter(|(_, t)| t.is_default)
            .map(|(id, _)| id)
            .collect()
    }

    fn register(&mut self, name: impl Into<String>, kind: TargetKind) -> TargetId {
        let name = name.into();
        let id = TargetId(self.targets.len());
        self.targets.push(Target::new(name.clone(), kind));
        // Last registration under a given name wins, matching the
        // original tool's linear "keep scanning, keep the latest match"
        // lookup behavior.
        self.names.insert(name, id);
        id
    }

    pub fn program(&mut self, name: impl Into<String>) -> Handle<'_, ProgramKind> {
        let id = self.register(name, TargetKind::Program);
        Handle::new(self, id)
    }

    pub fn static_library(&mut self, name: impl Into<String>) -> Handle<'_, StaticLibraryKind> {
        let id = self.register(name, TargetKind::StaticLibrary);
        Handle::new(self, id)
    }

    pub fn dynamic_library(&mut self, name: impl Into<String>) -> Handle<'_, DynamicLibraryKind> {
        let id = self.register(name, TargetKind::DynamicLibrary);
        Handle::new(self, id)
    }

    pub fn object(&mut self, name: impl Into<String>, include_paths: impl Into<String>) -> Handle<'_, ObjectKind> {
        let id = self.register(name, TargetKind::Object);
        let mut handle = Handle::new(self, id);
        handle = handle.include(include_paths);
        handle
    }

    pub fn extern_dynamic_library(&mut self, name: impl Into<String>) -> Handle<'_, ExternDynamicLibraryKind> {
        let id = self.register(name, TargetKind::ExternDynamicLibrary);
        Handle::new(self, id)
    }

    pub fn download(&mut self, name: impl Into<String>) -> Handle<'_, DownloadKind> {
        let id = self.register(name, TargetKind::Download { url: String::new() });
        Handle::new(self, id)
    }

    pub fn unarchive(&mut self, name: impl Into<String>) -> Handle<'_, UnarchiveKind> {
        let id = self.register(name, TargetKind::Unarchive { archive: String::new() });
        Handle::new(self, id)
    }

    pub fn exec(&mut self, name: impl Into<String>) -> Handle<'_, ExecKind> {
        let id = self.register(name, TargetKind::Exec(ExecSpec::default()));
        Handle::new(self, id)
    }

    pub fn target(&mut self, name: impl Into<String>) -> Handle<'_, CustomKind> {
        let id = self.register(name, TargetKind::Custom(None));
        Handle::new(self, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> DefinitionContext {
        DefinitionContext::new("/workspace", Kernel::console_only())
    }

    #[test]
    fn registers_and_looks_up_by_name() {
        let mut ctx = ctx();
        ctx.program("app").source("main.cpp").is_default(true);
        assert!(ctx.get_target("app").is_some());
        assert_eq!(ctx.get_default_targets().len(), 1);
    }

    #[test]
    fn later_registration_with_same_name_wins_lookup() {
        let mut ctx = ctx();
        ctx.program("app").source("one.cpp");
        ctx.program("app").source("two.cpp");
        let id = ctx.get_target_id("app").unwrap();
        assert_eq!(ctx.target_by_id(id).sources, vec!["two.cpp".to_string()]);
    }

    #[test]
    fn uses_may_forward_reference_a_not_yet_registered_target() {
        let mut ctx = ctx();
        ctx.program("app").source("main.cpp").uses("util");
        ctx.static_library("util").source("u.cpp");
        assert!(ctx.get_target("util").is_some());
    }

    #[test]
    fn builtin_configurations_are_registered() {
        let ctx = ctx();
        assert!(ctx.has_configuration("debug"));
        assert!(ctx.has_configuration("release"));
        assert!(!ctx.has_configuration("nonexistent"));
    }
}
