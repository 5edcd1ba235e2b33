use std::collections::HashSet;

use crate::task::{Priority, Task};

fn normalize_text(value: &str) -> String {
    value.trim().to_ascii_lowercase()
}

/// Compute the visible subset of the collection. A task passes when the
/// query is empty or its title/description contains the query
/// case-insensitively, AND the priority filter is unset or equal, AND the
/// category filter is unset or equal. Indices come back in input order.
pub fn filter_task_indices(
    tasks: &[Task],
    query: &str,
    priority: Option<Priority>,
    category: Option<&str>,
) -> Vec<usize> {
    let query_norm = normalize_text(query);
    let mut indices = Vec::new();

    for (idx, task) in tasks.iter().enumerate() {
        if let Some(wanted) = priority {
            if task.priority != wanted {
                continue;
            }
        }
        if let Some(wanted) = category {
            if task.category != wanted {
                continue;
            }
        }
        if query_norm.is_empty()
            || normalize_text(&task.title).contains(&query_norm)
            || normalize_text(&task.description).contains(&query_norm)
        {
            indices.push(idx);
        }
    }

    indices
}

/// Display order: incomplete tasks first, then ascending due date inside
/// each half. `sort_by` is stable, so equal keys keep their input order.
pub fn sort_tasks(tasks: &mut [Task]) {
    tasks.sort_by(|left, right| {
        left.completed
            .cmp(&right.completed)
            .then(left.due_date.cmp(&right.due_date))
    });
}

/// Display order for a set of visible indices, without touching the
/// underlying collection (which stays in server order). Stable, so ties
/// keep their filtered order.
pub fn sort_task_indices(tasks: &[Task], indices: &mut [usize]) {
    indices.sort_by(|&left, &right| {
        tasks[left]
            .completed
            .cmp(&tasks[right].completed)
            .then(tasks[left].due_date.cmp(&tasks[right].due_date))
    });
}

/// Keep the previous selection across a refilter when the task is still
/// visible, otherwise fall back to the first visible task.
pub fn select_by_id(tasks: &[Task], filtered: &[usize], previous_id: Option<&str>) -> Option<usize> {
    if filtered.is_empty() {
        return None;
    }
    if let Some(id) = previous_id {
        if let Some(index) = tasks.iter().position(|task| task.id == id) {
            if filtered.contains(&index) {
                return Some(index);
            }
        }
    }
    Some(filtered[0])
}

/// Reconcile a successful create: the server-returned record goes to the
/// front. Any stale copy of the same id is dropped first, keeping the
/// one-task-per-id invariant.
pub fn prepend_task(tasks: &mut Vec<Task>, task: Task) {
    tasks.retain(|existing| existing.id != task.id);
    tasks.insert(0, task);
}

/// Reconcile an update or toggle: patch the matching record in place.
/// Returns false when the id is no longer in the collection.
pub fn replace_task(tasks: &mut [Task], task: Task) -> bool {
    match tasks.iter_mut().find(|existing| existing.id == task.id) {
        Some(slot) => {
            *slot = task;
            true
        }
        None => false,
    }
}

/// Reconcile a delete. Returns false when the id was already gone.
pub fn remove_task(tasks: &mut Vec<Task>, id: &str) -> bool {
    let before = tasks.len();
    tasks.retain(|task| task.id != id);
    tasks.len() != before
}

/// Distinct non-empty categories across the loaded collection, first-seen
/// order. Recomputed on demand; at dashboard scale an index isn't worth it.
pub fn distinct_categories(tasks: &[Task]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut categories = Vec::new();
    for task in tasks {
        let category = task.category.trim();
        if category.is_empty() {
            continue;
        }
        if seen.insert(category.to_string()) {
            categories.push(category.to_string());
        }
    }
    categories
}
