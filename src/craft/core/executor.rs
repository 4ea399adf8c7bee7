//! The sequential task executor (spec.md §4.9): run the plan's tasks in
//! list order, stopping at the first non-zero result. No parallelism; the
//! append-after-recursion order the planner builds the list in already
//! guarantees every task's requirements ran before it.

use craft_log::{Kernel, Level};

use crate::core::task::Task;

/// Run every task in order. Returns `0` if all of them succeeded, or the
/// first non-zero status encountered.
pub fn run(tasks: &mut [Task], kernel: &Kernel) -> i32 {
    for (index, task) in tasks.iter_mut().enumerate() {
        let _span = kernel.span(task.type_tag.clone());
        let status = task.run();
        if status != 0 {
            kernel.log(
                "execute",
                Level::Error,
                format!("task #{index} ({}) failed with status {status}", task.type_tag),
            );
            return status;
        }
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::node::Node;
    use crate::core::task::TaskId;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting_task(counter: Arc<AtomicUsize>, status: i32, requirements: Vec<TaskId>) -> Task {
        Task::new("test", Vec::<Node>::new(), requirements, move || {
            counter.fetch_add(1, Ordering::SeqCst);
            status
        })
    }

    #[test]
    fn runs_every_task_in_order_when_all_succeed() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut tasks = vec![
            counting_task(counter.clone(), 0, Vec::new()),
            counting_task(counter.clone(), 0, Vec::new()),
            counting_task(counter.clone(), 0, Vec::new()),
        ];
        let status = run(&mut tasks, &Kernel::console_only());
        assert_eq!(status, 0);
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn stops_at_first_failing_task() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut tasks = vec![
            counting_task(counter.clone(), 0, Vec::new()),
            counting_task(counter.clone(), 7, Vec::new()),
            counting_task(counter.clone(), 0, Vec::new()),
        ];
        let status = run(&mut tasks, &Kernel::console_only());
        assert_eq!(status, 7);
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }
}
