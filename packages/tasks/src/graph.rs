// ABOUTME: Dependency graph over a task list
// ABOUTME: Cycle detection, topological ordering, and dependent lookups

use std::collections::{BTreeSet, HashMap, HashSet};
use taskforge_core::{Task, TaskStatus};

/// Task -> dependency adjacency in list order.
///
/// Dependencies on ids that are not in the list are dropped when the graph is
/// built, so they never take part in cycle detection or ordering.
#[derive(Debug, Clone)]
pub struct DependencyGraph<'a> {
    nodes: Vec<&'a str>,
    index: HashMap<&'a str, usize>,
    edges: Vec<Vec<usize>>,
}

impl<'a> DependencyGraph<'a> {
    pub fn new(tasks: &'a [Task]) -> Self {
        let mut nodes = Vec::with_capacity(tasks.len());
        let mut index = HashMap::with_capacity(tasks.len());

        for task in tasks {
            // Duplicate ids collapse onto the first occurrence
            if !index.contains_key(task.id.as_str()) {
                index.insert(task.id.as_str(), nodes.len());
                nodes.push(task.id.as_str());
            }
        }

        let mut edges = vec![Vec::new(); nodes.len()];
        for task in tasks {
            let from = index[task.id.as_str()];
            for dep in &task.dependencies {
                if let Some(&to) = index.get(dep.as_str()) {
                    if !edges[from].contains(&to) {
                        edges[from].push(to);
                    }
                }
            }
        }

        Self {
            nodes,
            index,
            edges,
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Known direct dependencies of `id`, in declaration order
    pub fn dependencies_of(&self, id: &str) -> Vec<&'a str> {
        self.index
            .get(id)
            .map(|&i| self.edges[i].iter().map(|&j| self.nodes[j]).collect())
            .unwrap_or_default()
    }

    /// Tasks that directly depend on `id`, in list order
    pub fn dependents_of(&self, id: &str) -> Vec<&'a str> {
        let Some(&target) = self.index.get(id) else {
            return Vec::new();
        };

        self.edges
            .iter()
            .enumerate()
            .filter(|(_, deps)| deps.contains(&target))
            .map(|(i, _)| self.nodes[i])
            .collect()
    }

    /// Detect circular dependencies.
    ///
    /// Each start node (in list order) contributes at most the first cycle
    /// reachable from it that has not been reported yet. A cycle is reported
    /// as the ids along the loop, starting from the node where the loop was
    /// entered. Nodes whose whole subtree was explored without turning up a
    /// new cycle are skipped by later starts.
    pub fn detect_cycles(&self) -> Vec<Vec<String>> {
        let mut cycles: Vec<Vec<String>> = Vec::new();
        let mut seen: Vec<BTreeSet<usize>> = Vec::new();
        let mut done = vec![false; self.nodes.len()];

        for start in 0..self.nodes.len() {
            if done[start] {
                continue;
            }

            let mut on_stack = vec![false; self.nodes.len()];
            let mut path = Vec::new();
            if let Some(cycle) =
                self.find_cycle(start, &mut done, &mut on_stack, &mut path, &seen)
            {
                cycles.push(cycle.iter().map(|&i| self.nodes[i].to_string()).collect());
                seen.push(cycle.into_iter().collect());
            }
        }

        cycles
    }

    pub fn has_cycles(&self) -> bool {
        !self.detect_cycles().is_empty()
    }

    fn find_cycle(
        &self,
        node: usize,
        done: &mut [bool],
        on_stack: &mut [bool],
        path: &mut Vec<usize>,
        seen: &[BTreeSet<usize>],
    ) -> Option<Vec<usize>> {
        on_stack[node] = true;
        path.push(node);

        for &next in &self.edges[node] {
            if on_stack[next] {
                if let Some(cycle_start) = path.iter().position(|&n| n == next) {
                    let cycle = &path[cycle_start..];
                    let members: BTreeSet<usize> = cycle.iter().copied().collect();
                    if !seen.contains(&members) {
                        return Some(cycle.to_vec());
                    }
                }
            } else if !done[next] {
                if let Some(cycle) = self.find_cycle(next, done, on_stack, path, seen) {
                    return Some(cycle);
                }
            }
        }

        path.pop();
        on_stack[node] = false;
        done[node] = true;
        None
    }

    /// A dependency loop that leads back to `id`, starting at `id`
    pub fn cycle_through(&self, id: &str) -> Option<Vec<String>> {
        let &start = self.index.get(id)?;
        let mut parent: Vec<Option<usize>> = vec![None; self.nodes.len()];
        let mut visited = vec![false; self.nodes.len()];
        visited[start] = true;
        let mut stack = vec![start];

        while let Some(node) = stack.pop() {
            for &next in &self.edges[node] {
                if next == start {
                    let mut cycle = vec![node];
                    let mut current = node;
                    while let Some(prev) = parent[current] {
                        cycle.push(prev);
                        current = prev;
                    }
                    cycle.reverse();
                    return Some(cycle.iter().map(|&i| self.nodes[i].to_string()).collect());
                }
                if !visited[next] {
                    visited[next] = true;
                    parent[next] = Some(node);
                    stack.push(next);
                }
            }
        }

        None
    }

    /// Order tasks so every task comes after its dependencies.
    ///
    /// Among tasks that are ready at the same time, list order wins. Fails with
    /// the first detected cycle when no complete order exists.
    pub fn topological_order(&self) -> Result<Vec<&'a str>, Vec<String>> {
        let count = self.nodes.len();
        let mut remaining: Vec<usize> = self.edges.iter().map(Vec::len).collect();
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); count];
        for (from, deps) in self.edges.iter().enumerate() {
            for &to in deps {
                dependents[to].push(from);
            }
        }

        let mut ready: BTreeSet<usize> = (0..count).filter(|&i| remaining[i] == 0).collect();
        let mut order = Vec::with_capacity(count);

        while let Some(next) = ready.pop_first() {
            order.push(self.nodes[next]);
            for &dependent in &dependents[next] {
                remaining[dependent] -= 1;
                if remaining[dependent] == 0 {
                    ready.insert(dependent);
                }
            }
        }

        if order.len() == count {
            Ok(order)
        } else {
            Err(self.detect_cycles().into_iter().next().unwrap_or_default())
        }
    }
}

/// Dependencies of `task` that exist in `tasks` and are not done yet
pub fn unmet_dependencies<'a>(task: &'a Task, tasks: &'a [Task]) -> Vec<&'a str> {
    task.dependencies
        .iter()
        .filter(|dep| {
            tasks
                .iter()
                .find(|t| &t.id == *dep)
                .is_some_and(|t| t.status != TaskStatus::Done)
        })
        .map(String::as_str)
        .collect()
}

/// Render a cycle as `a -> b -> c -> a`
pub fn format_cycle(cycle: &[String]) -> String {
    let mut parts: Vec<&str> = cycle.iter().map(String::as_str).collect();
    if let Some(first) = cycle.first() {
        parts.push(first);
    }
    parts.join(" -> ")
}

/// Ids that occur more than once, each reported once in first-seen order
pub(crate) fn duplicate_ids<'a, I>(ids: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();
    for id in ids {
        if !seen.insert(id) && !duplicates.contains(&id) {
            duplicates.push(id);
        }
    }
    duplicates
}
