use std::path::PathBuf;

use crate::core::node::Node;
use crate::core::target::TargetId;
use crate::core::task::TaskId;

/// The per-configuration materialization of a target (spec.md §3): its
/// resolved output, the tasks needed to produce it (empty when it was
/// already fresh), and back-reference to the definition it came from.
#[derive(Debug, Clone)]
pub struct BuiltTarget {
    pub source_target: TargetId,
    pub output_node: Option<Node>,
    pub output_tasks: Vec<TaskId>,
    /// Resolved `library_path` for an `ExternDynamicLibrary`; unused by
    /// every other kind.
    pub resolved_library_path: Option<String>,
    /// Compiled object files this target contributes to whatever links
    /// against it. Populated by `Object`, `Program`, `StaticLibrary` and
    /// `DynamicLibrary`; empty otherwise.
    pub object_files: Vec<PathBuf>,
}

impl BuiltTarget {
    pub fn new(source_target: TargetId) -> BuiltTarget {
        BuiltTarget {
            source_target,
            output_node: None,
            output_tasks: Vec::new(),
            resolved_library_path: None,
            object_files: Vec::new(),
        }
    }
}
