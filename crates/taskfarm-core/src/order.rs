use crate::TaskSpec;

/// Return a new list, stably sorted by priority rank (High first). Ties
/// keep their original relative order; the input is not mutated.
pub fn order_by_priority(tasks: &[TaskSpec]) -> Vec<TaskSpec> {
    let mut ordered = tasks.to_vec();
    // Vec::sort_by_key is a stable sort.
    ordered.sort_by_key(|t| t.priority);
    ordered
}
