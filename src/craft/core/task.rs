use crate::core::node::Node;

/// Index of a [`Task`] within a [`PlanContext`](crate::core::plan_context::PlanContext)'s
/// task list. Tasks are only ever appended, so a `TaskId` is stable and,
/// by construction (append-after-recursion, see spec.md §3), always
/// smaller than the id of any task that requires it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(pub usize);

/// A unit of planned work (spec.md §3): a type tag, the output nodes it
/// produces (if any), a runner, and the other tasks that must succeed
/// before it runs.
pub struct Task {
    pub type_tag: String,
    pub outputs: Vec<Node>,
    pub requirements: Vec<TaskId>,
    runner: Box<dyn FnMut() -> i32>,
}

impl Task {
    pub fn new(
        type_tag: impl Into<String>,
        outputs: Vec<Node>,
        requirements: Vec<TaskId>,
        runner: impl FnMut() -> i32 + 'static,
    ) -> Task {
        Task {
            type_tag: type_tag.into(),
            outputs,
            requirements,
            runner: Box::new(runner),
        }
    }

    /// Run this task's closure. 0 means success, matching the C-style
    /// status codes the original tool's task runners returned.
    pub fn run(&mut self) -> i32 {
        (self.runner)()
    }
}

impl std::fmt::Debug for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Task")
            .field("type_tag", &self.type_tag)
            .field("outputs", &self.outputs)
            .field("requirements", &self.requirements)
            .finish_non_exhaustive()
    }
}
