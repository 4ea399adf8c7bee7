//! The end-to-end orchestration (spec.md §4.10): load the craftfile, plan
//! the requested targets under the requested configurations, and run the
//! resulting tasks.

use std::path::Path;
use std::sync::Arc;

use craft_log::{Kernel, Level};

use crate::core::definition_context::DefinitionContext;
use crate::core::error::CraftResult;
use crate::core::plan_context::PlanContext;
use crate::ops::craftfile;

/// What to build, resolved from the command line (spec.md §6).
pub struct BuildRequest {
    pub workspace: std::path::PathBuf,
    pub craftfile_dir: std::path::PathBuf,
    pub configurations: Vec<String>,
    pub target_names: Vec<String>,
}

/// Load the craftfile, plan every requested target under every requested
/// configuration, and run the tasks. Returns the first non-zero task
/// status encountered, or 0 on success.
pub fn run(request: &BuildRequest, kernel: &Kernel) -> CraftResult<i32> {
    let mut definitions = DefinitionContext::new(request.workspace.clone(), kernel.clone());
    craftfile::load(&request.craftfile_dir, &mut definitions, kernel)?;
    let definitions = Arc::new(definitions);

    let configurations = if request.configurations.is_empty() {
        definitions.default_configurations().to_vec()
    } else {
        request.configurations.clone()
    };

    for configuration in &configurations {
        let status = build_one_configuration(&definitions, configuration, &request.target_names, kernel)?;
        if status != 0 {
            return Ok(status);
        }
    }
    Ok(0)
}

fn build_one_configuration(
    definitions: &Arc<DefinitionContext>,
    configuration: &str,
    target_names: &[String],
    kernel: &Kernel,
) -> CraftResult<i32> {
    let _span = kernel.span(format!("configuration:{configuration}"));
    let mut plan = PlanContext::new(Arc::clone(definitions), kernel.clone(), configuration.to_string())?;

    let names: Vec<String> = if target_names.is_empty() {
        definitions
            .get_default_targets()
            .into_iter()
            .map(|id| definitions.target_by_id(id).name.clone())
            .collect()
    } else {
        target_names.to_vec()
    };

    for name in &names {
        plan.get_built_target(name)?;
    }

    let mut tasks = plan.into_tasks();
    kernel.log(
        "plan",
        Level::Info,
        format!("{configuration}: {} task(s) to run", tasks.len()),
    );
    Ok(crate::core::executor::run(&mut tasks, kernel))
}

/// Resolve `craftfile_dir` relative to `workspace`, defaulting to the
/// workspace root itself (spec.md §6: craftfiles live at the workspace root
/// unless told otherwise).
pub fn craftfile_dir_for(workspace: &Path) -> std::path::PathBuf {
    workspace.to_path_buf()
}
