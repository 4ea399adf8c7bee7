//! The planner (spec.md §4.2–§4.9): turns a [`DefinitionContext`] plus a
//! chosen configuration into a dependency-ordered [`Task`] list, skipping
//! anything whose output is already fresh.
//!
//! Staleness follows three rules: an output that doesn't exist is stale; an
//! output older than any of its inputs is stale; and an input that is
//! itself the pending output of a task already queued in this same plan is
//! stale, even if the file on disk hasn't caught up yet (it hasn't been
//! produced this run). A freshly created parent directory also forces
//! staleness, since nothing could already live in a directory that didn't
//! exist a moment ago.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use craft_log::{Kernel, Level};
use itertools::Itertools;

use crate::core::built_target::BuiltTarget;
use crate::core::compiler::{CompilerBackend, LinkInput};
use crate::core::configuration::Configuration;
use crate::core::definition_context::DefinitionContext;
use crate::core::error::{CraftError, CraftResult};
use crate::core::node::Node;
use crate::core::target::{CustomBuildFn, ExecSpec, Target, TargetId, TargetKind};
use crate::core::task::{Task, TaskId};

#[derive(Default)]
struct UsesResolution {
    export_includes: Vec<String>,
    link_inputs: Vec<LinkInput>,
    /// Files a linked output should be considered stale against (the
    /// archives/shared libraries behind `link_inputs`, not system-provided
    /// extern libraries).
    link_input_files: Vec<PathBuf>,
    extra_objects: Vec<PathBuf>,
    requirement_tasks: Vec<TaskId>,
}

#[derive(Clone, Copy)]
enum LinkKind {
    Program,
    StaticLibrary,
    DynamicLibrary,
}

/// Owns the growing task list and the memoized per-target materializations
/// for one build (spec.md §2.6 "Plan context").
pub struct PlanContext {
    definitions: Arc<DefinitionContext>,
    kernel: Kernel,
    current_configuration: String,
    tasks: Vec<Task>,
    pending_outputs: HashSet<PathBuf>,
    built_sensitive: HashMap<(TargetId, String), BuiltTarget>,
    built_insensitive: HashMap<TargetId, BuiltTarget>,
    in_progress: HashSet<TargetId>,
}

impl PlanContext {
    pub fn new(definitions: Arc<DefinitionContext>, kernel: Kernel, configuration: impl Into<String>) -> CraftResult<PlanContext> {
        let configuration = configuration.into();
        if !definitions.has_configuration(&configuration) {
            return Err(CraftError::UnknownConfiguration(configuration).into());
        }
        Ok(PlanContext {
            definitions,
            kernel,
            current_configuration: configuration,
            tasks: Vec::new(),
            pending_outputs: HashSet::new(),
            built_sensitive: HashMap::new(),
            built_insensitive: HashMap::new(),
            in_progress: HashSet::new(),
        })
    }

    pub fn definitions(&self) -> &DefinitionContext {
        &self.definitions
    }

    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    pub fn current_configuration(&self) -> &str {
        &self.current_configuration
    }

    pub fn set_current_configuration(&mut self, name: impl Into<String>) -> CraftResult<()> {
        let name = name.into();
        if !self.definitions.has_configuration(&name) {
            return Err(CraftError::UnknownConfiguration(name).into());
        }
        self.current_configuration = name;
        Ok(())
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Consume the plan, returning its dependency-ordered task list.
    pub fn into_tasks(self) -> Vec<Task> {
        self.tasks
    }

    /// Materialize the named target under the current configuration,
    /// appending whatever tasks are needed (spec.md §4.1's `get_built_target`).
    #[tracing::instrument(skip(self), fields(configuration = %self.current_configuration))]
    pub fn get_built_target(&mut self, name: &str) -> CraftResult<BuiltTarget> {
        let id = self
            .definitions
            .get_target_id(name)
            .ok_or_else(|| CraftError::UnknownTarget(name.to_string()))?;
        self.materialize(id)
    }

    fn configuration(&self) -> CraftResult<Configuration> {
        self.definitions
            .get_configuration(&self.current_configuration)
            .cloned()
            .ok_or_else(|| CraftError::UnknownConfiguration(self.current_configuration.clone()).into())
    }

    fn output_dir(&self) -> PathBuf {
        let platform = self.definitions.target_platform();
        let mut dir = self.definitions.build_root().join(&self.current_configuration);
        if !platform.is_host {
            dir = dir.join(platform.name());
        }
        dir
    }

    #[tracing::instrument(skip(self), fields(target = %self.definitions.target_by_id(id).name))]
    fn materialize(&mut self, id: TargetId) -> CraftResult<BuiltTarget> {
        let target = self.definitions.target_by_id(id);
        let sensitive = target.is_configuration_sensitive();
        tracing::debug!(kind = ?target.kind, "materializing target");

        if sensitive {
            if let Some(built) = self.built_sensitive.get(&(id, self.current_configuration.clone())) {
                return Ok(built.clone());
            }
        } else if let Some(built) = self.built_insensitive.get(&id) {
            return Ok(built.clone());
        }

        if !self.in_progress.insert(id) {
            return Err(CraftError::UsesCycle(target.name.clone()).into());
        }

        let result = self.materialize_uncached(id);
        self.in_progress.remove(&id);
        let built = result?;

        if sensitive {
            self.built_sensitive.insert((id, self.current_configuration.clone()), built.clone());
        } else {
            self.built_insensitive.insert(id, built.clone());
        }
        Ok(built)
    }

    fn materialize_uncached(&mut self, id: TargetId) -> CraftResult<BuiltTarget> {
        let target = self.definitions.target_by_id(id).clone();
        match target.kind.clone() {
            TargetKind::Program => self.materialize_linked(id, &target, LinkKind::Program),
            TargetKind::StaticLibrary => self.materialize_linked(id, &target, LinkKind::StaticLibrary),
            TargetKind::DynamicLibrary => self.materialize_linked(id, &target, LinkKind::DynamicLibrary),
            TargetKind::Object => self.materialize_object(id, &target),
            TargetKind::ExternDynamicLibrary => self.materialize_extern_dynamic_library(id, &target),
            TargetKind::Download { url } => self.materialize_download(id, &target, &url),
            TargetKind::Unarchive { archive } => self.materialize_unarchive(id, &target, &archive),
            TargetKind::Exec(spec) => self.materialize_exec(id, &target, &spec),
            TargetKind::Custom(closure) => self.materialize_custom(id, closure),
        }
    }

    fn resolve_uses(&mut self, target: &Target) -> CraftResult<UsesResolution> {
        let mut resolution = UsesResolution::default();
        for name in craft_util::split_all(&target.uses) {
            let used_id = self
                .definitions
                .get_target_id(&name)
                .ok_or_else(|| CraftError::UnknownTarget(name.clone()))?;
            let built = self.materialize(used_id)?;
            let used_target = self.definitions.target_by_id(used_id).clone();

            resolution.export_includes.extend(used_target.export_includes.iter().cloned());
            resolution.requirement_tasks.extend(built.output_tasks.iter().copied());

            match used_target.kind {
                TargetKind::StaticLibrary => {
                    if let Some(node) = &built.output_node {
                        resolution.link_input_files.push(node.absolute_path.clone());
                        resolution
                            .link_inputs
                            .push(LinkInput::StaticLibraryArchive(node.absolute_path.clone()));
                    }
                }
                TargetKind::DynamicLibrary => {
                    if let Some(node) = &built.output_node {
                        resolution.link_input_files.push(node.absolute_path.clone());
                        let output_dir = node.absolute_path.parent().map(Path::to_path_buf).unwrap_or_default();
                        resolution.link_inputs.push(LinkInput::DynamicLibrary {
                            name: used_target.name.clone(),
                            output_dir,
                        });
                    }
                }
                TargetKind::ExternDynamicLibrary => {
                    resolution.link_inputs.push(LinkInput::ExternDynamicLibrary {
                        name: used_target.name.clone(),
                        library_path: built.resolved_library_path.clone(),
                    });
                }
                TargetKind::Object => {
                    resolution.extra_objects.extend(built.object_files.iter().cloned());
                }
                _ => {}
            }
        }
        Ok(resolution)
    }

    fn compile_sources(
        &mut self,
        target: &Target,
        include_paths: &[String],
        requirements: &[TaskId],
    ) -> CraftResult<(Vec<PathBuf>, Vec<TaskId>)> {
        let workspace = self.definitions.workspace().to_path_buf();
        let output_dir = self.output_dir();
        craft_platform::fs::create_directories(&output_dir)?;
        let toolchain = self.definitions.toolchain();
        let configuration = self.configuration()?;

        let mut objects = Vec::new();
        let mut task_ids = Vec::new();

        for source in craft_util::split_all(&target.sources) {
            let source_abs = resolve_path(&workspace, &source);
            let relative = source_abs.strip_prefix(&workspace).unwrap_or(&source_abs);
            let object_abs = craft_platform::fs::replace_extension(&output_dir.join(relative), "o");
            let freshly_created = match object_abs.parent() {
                Some(parent) => craft_platform::fs::create_directories(parent)?,
                None => false,
            };

            let backend = toolchain.backend();
            let mut inputs = vec![source_abs.clone()];
            inputs.extend(backend.get_compile_dependencies(&source_abs, include_paths, &workspace)?);

            if freshly_created || self.is_stale(&inputs, &object_abs) {
                let task_id = self.append_compile_task(
                    target.name.clone(),
                    source_abs,
                    object_abs.clone(),
                    include_paths.to_vec(),
                    configuration.clone(),
                    requirements.to_vec(),
                );
                task_ids.push(task_id);
            }
            objects.push(object_abs);
        }

        Ok((objects, task_ids))
    }

    fn is_stale(&self, inputs: &[PathBuf], output: &Path) -> bool {
        let output_time = match craft_platform::fs::modification_time(output) {
            Some(t) => t,
            None => return true,
        };
        inputs.iter().any(|input| {
            self.pending_outputs.contains(input)
                || match craft_platform::fs::modification_time(input) {
                    Some(t) => t > output_time,
                    None => true,
                }
        })
    }

    fn append_compile_task(
        &mut self,
        target_name: String,
        source: PathBuf,
        output: PathBuf,
        include_paths: Vec<String>,
        configuration: Configuration,
        requirements: Vec<TaskId>,
    ) -> TaskId {
        let kernel = self.kernel.clone();
        let toolchain = self.definitions.toolchain();
        let output_for_closure = output.clone();

        self.pending_outputs.insert(output.clone());

        let task = Task::new("compile", vec![Node::new(output)], requirements, move || {
            let backend = toolchain.backend();
            match backend.compile(&source, &output_for_closure, &include_paths, &configuration, &kernel) {
                Ok(status) => status,
                Err(err) => {
                    kernel.log(&target_name, Level::Error, err.to_string());
                    -1
                }
            }
        });
        self.tasks.push(task);
        TaskId(self.tasks.len() - 1)
    }

    #[allow(clippy::too_many_arguments)]
    fn append_link_task(
        &mut self,
        label: &'static str,
        target_name: String,
        output: PathBuf,
        objects: Vec<PathBuf>,
        inputs: Vec<LinkInput>,
        export_library_options: Vec<String>,
        requirements: Vec<TaskId>,
        kind: LinkKind,
    ) -> CraftResult<TaskId> {
        let kernel = self.kernel.clone();
        let toolchain = self.definitions.toolchain();
        let configuration = self.configuration()?;
        let output_for_closure = output.clone();

        self.pending_outputs.insert(output.clone());

        let task = Task::new(label, vec![Node::new(output)], requirements, move || {
            let backend = toolchain.backend();
            let result = match kind {
                LinkKind::Program => backend.link_program(
                    &output_for_closure,
                    &objects,
                    &inputs,
                    &export_library_options,
                    &configuration,
                    &kernel,
                ),
                LinkKind::StaticLibrary => backend.link_static_library(&output_for_closure, &objects, &kernel),
                LinkKind::DynamicLibrary => backend.link_dynamic_library(
                    &output_for_closure,
                    &objects,
                    &inputs,
                    &export_library_options,
                    &configuration,
                    &kernel,
                ),
            };
            match result {
                Ok(status) => status,
                Err(err) => {
                    kernel.log(&target_name, Level::Error, err.to_string());
                    -1
                }
            }
        });
        self.tasks.push(task);
        Ok(TaskId(self.tasks.len() - 1))
    }

    fn materialize_linked(&mut self, id: TargetId, target: &Target, kind: LinkKind) -> CraftResult<BuiltTarget> {
        let resolution = self.resolve_uses(target)?;
        let include_paths = merge_includes(&target.includes, &resolution.export_includes);
        let (own_objects, compile_tasks) = self.compile_sources(target, &include_paths, &resolution.requirement_tasks)?;

        let mut objects = own_objects;
        objects.extend(resolution.extra_objects.iter().cloned());

        let output_dir = self.output_dir();
        craft_platform::fs::create_directories(&output_dir)?;
        let target_platform = self.definitions.target_platform();
        let (file_name, label) = match kind {
            LinkKind::Program => (target_platform.program_file_name(&target.name), "link"),
            LinkKind::StaticLibrary => (format!("lib{}.a", target.name), "archive"),
            LinkKind::DynamicLibrary => (target_platform.dynamic_library_file_name(&target.name), "link"),
        };
        let output_path = output_dir.join(file_name);

        let mut requirements = compile_tasks;
        requirements.extend(resolution.requirement_tasks.iter().copied());

        let mut stale_inputs = objects.clone();
        if !matches!(kind, LinkKind::StaticLibrary) {
            stale_inputs.extend(resolution.link_input_files.iter().cloned());
        }

        let mut built = BuiltTarget::new(id);
        built.output_tasks = requirements.clone();
        if self.is_stale(&stale_inputs, &output_path) {
            let export_library_options = craft_util::split_all(&target.export_library_options);
            let task_id = self.append_link_task(
                label,
                target.name.clone(),
                output_path.clone(),
                objects.clone(),
                resolution.link_inputs,
                export_library_options,
                requirements,
                kind,
            )?;
            built.output_tasks.push(task_id);
        }
        built.output_node = Some(Node::new(output_path));
        built.object_files = objects;
        Ok(built)
    }

    fn materialize_object(&mut self, id: TargetId, target: &Target) -> CraftResult<BuiltTarget> {
        let resolution = self.resolve_uses(target)?;
        let include_paths = merge_includes(&target.includes, &resolution.export_includes);
        let (own_objects, compile_tasks) = self.compile_sources(target, &include_paths, &resolution.requirement_tasks)?;

        let mut built = BuiltTarget::new(id);
        built.object_files = own_objects;
        built.object_files.extend(resolution.extra_objects.iter().cloned());
        built.output_tasks = compile_tasks;
        built.output_tasks.extend(resolution.requirement_tasks.iter().copied());
        Ok(built)
    }

    fn materialize_extern_dynamic_library(&mut self, _id: TargetId, target: &Target) -> CraftResult<BuiltTarget> {
        let mut built = BuiltTarget::new(_id);
        built.resolved_library_path = target.library_path.as_ref().map(|lp| lp.resolve(self));
        Ok(built)
    }

    fn materialize_download(&mut self, id: TargetId, target: &Target, url: &str) -> CraftResult<BuiltTarget> {
        let dir = self.definitions.build_root().join("downloads");
        craft_platform::fs::create_directories(&dir)?;
        let output_path = dir.join(craft_util::escape_for_filename(url));

        let mut built = BuiltTarget::new(id);
        if !craft_platform::fs::exists(&output_path) {
            let kernel = self.kernel.clone();
            let url = url.to_string();
            let target_name = target.name.clone();
            let output_for_closure = output_path.clone();
            self.pending_outputs.insert(output_path.clone());

            let task = Task::new("download", vec![Node::new(output_path.clone())], Vec::new(), move || {
                match crate::ops::download::download(&url, &output_for_closure, &kernel) {
                    Ok(()) => 0,
                    Err(err) => {
                        kernel.log(&target_name, Level::Error, err.to_string());
                        -1
                    }
                }
            });
            self.tasks.push(task);
            built.output_tasks = vec![TaskId(self.tasks.len() - 1)];
        }
        built.output_node = Some(Node::new(output_path));
        Ok(built)
    }

    fn materialize_unarchive(&mut self, id: TargetId, target: &Target, archive_target_name: &str) -> CraftResult<BuiltTarget> {
        let archive_id = self
            .definitions
            .get_target_id(archive_target_name)
            .ok_or_else(|| CraftError::UnknownTarget(archive_target_name.to_string()))?;
        let archive_built = self.materialize(archive_id)?;
        let archive_node = archive_built
            .output_node
            .clone()
            .ok_or_else(|| anyhow::anyhow!("target `{archive_target_name}` produced no output to unarchive"))?;

        let dest_dir = self.definitions.build_root().join("unarchived").join(&target.name);
        let freshly_created = craft_platform::fs::create_directories(&dest_dir)?;
        let marker = dest_dir.join(".craft-unarchived");

        let mut built = BuiltTarget::new(id);
        let mut requirements = archive_built.output_tasks.clone();
        built.output_tasks = requirements.clone();

        if freshly_created || self.is_stale(&[archive_node.absolute_path.clone()], &marker) {
            let kernel = self.kernel.clone();
            let target_name = target.name.clone();
            let archive_path = archive_node.absolute_path.clone();
            let dest_for_closure = dest_dir.clone();
            let marker_for_closure = marker.clone();
            self.pending_outputs.insert(marker.clone());

            let task = Task::new("unarchive", vec![Node::new(marker)], requirements.clone(), move || {
                let result = crate::ops::unarchive::unarchive(&archive_path, &dest_for_closure, &kernel)
                    .and_then(|()| std::fs::write(&marker_for_closure, b"").map_err(Into::into));
                match result {
                    Ok(()) => 0,
                    Err(err) => {
                        kernel.log(&target_name, Level::Error, err.to_string());
                        -1
                    }
                }
            });
            self.tasks.push(task);
            requirements.push(TaskId(self.tasks.len() - 1));
            built.output_tasks = requirements;
        }
        built.output_node = Some(Node::new(dest_dir));
        Ok(built)
    }

    fn materialize_exec(&mut self, id: TargetId, target: &Target, spec: &ExecSpec) -> CraftResult<BuiltTarget> {
        let resolution = self.resolve_uses(target)?;
        let mut requirements = resolution.requirement_tasks;

        let workspace = self.definitions.workspace().to_path_buf();
        let working_folder = if spec.working_folder.is_empty() {
            workspace
        } else {
            resolve_path(&workspace, &spec.working_folder)
        };
        let program = spec.program.clone();
        let args: Vec<String> = spec.args.iter().flat_map(|a| craft_util::split_whitespace_list(a)).collect();
        let max_time = spec.max_time_milliseconds;
        let log_output = spec.log_output;
        let log_error = spec.log_error;
        let log_name = spec.log_name.clone().unwrap_or_else(|| target.name.clone());
        let ignore_fail = spec.ignore_fail;
        let kernel = self.kernel.clone();

        let task = Task::new("exec", Vec::new(), requirements.clone(), move || {
            let mut out = String::new();
            let mut err = String::new();
            let outcome = match craft_platform::process::run(
                &working_folder,
                &program,
                &args,
                |s| out.push_str(s),
                |s| err.push_str(s),
                max_time,
            ) {
                Ok(outcome) => outcome,
                Err(error) => {
                    kernel.log(&log_name, Level::Error, error.to_string());
                    return -1;
                }
            };
            if log_output {
                kernel.log_lines(&log_name, Level::Verbose, &out);
            }
            if log_error {
                kernel.log_lines(&log_name, Level::Verbose, &err);
            }
            if max_time > 0 {
                kernel.log_int(&log_name, Level::Info, "killed", outcome.killed as i64);
            }
            if outcome.status != 0 {
                kernel.log(&log_name, Level::Error, format!("`{program}` exited with status {}", outcome.status));
                if ignore_fail {
                    0
                } else {
                    outcome.status
                }
            } else {
                0
            }
        });
        self.tasks.push(task);
        requirements.push(TaskId(self.tasks.len() - 1));

        let mut built = BuiltTarget::new(id);
        built.output_tasks = requirements;
        Ok(built)
    }

    fn materialize_custom(&mut self, id: TargetId, closure: Option<CustomBuildFn>) -> CraftResult<BuiltTarget> {
        match closure {
            Some(closure) => closure(self, id),
            None => {
                let target = self.definitions.target_by_id(id).clone();
                let resolution = self.resolve_uses(&target)?;
                let mut built = BuiltTarget::new(id);
                built.output_tasks = resolution.requirement_tasks;
                Ok(built)
            }
        }
    }
}

/// Union this target's own include paths with whatever its `uses` export,
/// preserving declaration order and dropping duplicates (several used
/// targets commonly export the same path, which would otherwise pile up
/// as repeated `-I` flags on the compile line).
fn merge_includes(own: &[String], exported: &[String]) -> Vec<String> {
    craft_util::split_all(own)
        .into_iter()
        .chain(craft_util::split_all(exported))
        .unique()
        .collect()
}

fn resolve_path(workspace: &Path, value: &str) -> PathBuf {
    let path = Path::new(value);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        workspace.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::definition_context::DefinitionContext;

    fn ctx(workspace: &Path) -> DefinitionContext {
        DefinitionContext::new(workspace, Kernel::console_only())
    }

    #[test]
    fn unknown_target_name_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let definitions = Arc::new(ctx(dir.path()));
        let mut plan = PlanContext::new(definitions, Kernel::console_only(), "release").unwrap();
        let err = plan.get_built_target("nonexistent").unwrap_err();
        assert!(err.downcast_ref::<CraftError>().is_some());
    }

    #[test]
    fn unknown_configuration_is_rejected_at_construction() {
        let dir = tempfile::tempdir().unwrap();
        let definitions = Arc::new(ctx(dir.path()));
        let err = PlanContext::new(definitions, Kernel::console_only(), "nonexistent").unwrap_err();
        assert!(err.downcast_ref::<CraftError>().is_some());
    }

    #[test]
    fn object_target_with_no_sources_has_no_tasks() {
        let dir = tempfile::tempdir().unwrap();
        let mut definitions = ctx(dir.path());
        definitions.object("obj", "");
        let definitions = Arc::new(definitions);
        let mut plan = PlanContext::new(definitions, Kernel::console_only(), "release").unwrap();
        let built = plan.get_built_target("obj").unwrap();
        assert!(built.output_tasks.is_empty());
        assert!(built.object_files.is_empty());
    }

    #[test]
    fn using_an_unregistered_name_surfaces_unknown_target() {
        let dir = tempfile::tempdir().unwrap();
        let mut definitions = ctx(dir.path());
        definitions.program("app").uses("missing");
        let definitions = Arc::new(definitions);
        let mut plan = PlanContext::new(definitions, Kernel::console_only(), "release").unwrap();
        let err = plan.get_built_target("app").unwrap_err();
        assert!(err.downcast_ref::<CraftError>().is_some());
    }

    #[test]
    fn direct_use_cycle_is_detected() {
        let dir = tempfile::tempdir().unwrap();
        let mut definitions = ctx(dir.path());
        definitions.static_library("a").uses("b");
        definitions.static_library("b").uses("a");
        let definitions = Arc::new(definitions);
        let mut plan = PlanContext::new(definitions, Kernel::console_only(), "release").unwrap();
        let err = plan.get_built_target("a").unwrap_err();
        assert!(matches!(err.downcast_ref::<CraftError>(), Some(CraftError::UsesCycle(_))));
    }

    #[cfg(unix)]
    #[test]
    fn exec_timeout_logs_a_killed_event() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("build.axelog");
        let kernel = Kernel::start(Some(log_path.clone()), craft_log::Level::Fatal).unwrap();

        let mut definitions = ctx(dir.path());
        definitions.exec("slow").program("sleep").args("10").max_time(100).ignore_fail(true);
        let definitions = Arc::new(definitions);
        let mut plan = PlanContext::new(definitions, kernel.clone(), "release").unwrap();
        plan.get_built_target("slow").unwrap();
        let mut tasks = plan.into_tasks();
        crate::core::executor::run(&mut tasks, &kernel);
        kernel.shutdown();

        let bytes = std::fs::read(&log_path).unwrap();
        let mut cursor = &bytes[..];
        craft_log::binary::read_header(&mut cursor).unwrap();
        let mut found_killed = false;
        while let Some(event) = craft_log::binary::read_event(&mut cursor).unwrap() {
            if event.message == "killed" && matches!(event.data, craft_log::Data::Int(1)) {
                found_killed = true;
            }
        }
        assert!(found_killed, "expected a killed=1 event to be logged");
    }
}
