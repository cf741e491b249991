//! Depth-first topological ordering.

use rustc_hash::FxHashMap;
use std::hash::Hash;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// Order `roots` and everything reachable from them so that each node comes
/// after its dependencies.
///
/// Nodes are deduplicated by `key`. Among independent nodes the order of
/// first appearance in `roots` is kept; each node's dependencies are visited
/// in the order `deps` returns them. On a cycle the error holds the cycle
/// path, starting and ending with the same node.
pub fn topological_sort<T, K, FK, FD>(
    roots: impl IntoIterator<Item = T>,
    key: FK,
    deps: FD,
) -> Result<Vec<T>, Vec<T>>
where
    T: Clone,
    K: Eq + Hash,
    FK: Fn(&T) -> K,
    FD: Fn(&T) -> Vec<T>,
{
    let mut marks: FxHashMap<K, Mark> = FxHashMap::default();
    let mut order = Vec::new();
    // (node, its dependencies, next dependency to visit)
    let mut stack: Vec<(T, Vec<T>, usize)> = Vec::new();

    for root in roots {
        if marks.contains_key(&key(&root)) {
            continue;
        }
        marks.insert(key(&root), Mark::Visiting);
        let children = deps(&root);
        stack.push((root, children, 0));

        while let Some((_, children, next)) = stack.last_mut() {
            if let Some(child) = children.get(*next).cloned() {
                *next += 1;
                match marks.get(&key(&child)) {
                    Some(Mark::Done) => {}
                    Some(Mark::Visiting) => return Err(cycle_path(&stack, child, &key)),
                    None => {
                        marks.insert(key(&child), Mark::Visiting);
                        let grandchildren = deps(&child);
                        stack.push((child, grandchildren, 0));
                    }
                }
            } else if let Some((node, _, _)) = stack.pop() {
                marks.insert(key(&node), Mark::Done);
                order.push(node);
            }
        }
    }

    Ok(order)
}

fn cycle_path<T, K, FK>(stack: &[(T, Vec<T>, usize)], repeat: T, key: &FK) -> Vec<T>
where
    T: Clone,
    K: Eq,
    FK: Fn(&T) -> K,
{
    let target = key(&repeat);
    let start = stack
        .iter()
        .position(|(node, _, _)| key(node) == target)
        .unwrap_or(0);
    let mut path: Vec<T> = stack[start..].iter().map(|(node, _, _)| node.clone()).collect();
    path.push(repeat);
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(edges: &[(&'static str, &[&'static str])]) -> impl Fn(&&'static str) -> Vec<&'static str> {
        let edges: FxHashMap<&str, Vec<&str>> =
            edges.iter().map(|(n, d)| (*n, d.to_vec())).collect();
        move |node| edges.get(node).cloned().unwrap_or_default()
    }

    #[test]
    fn test_dependencies_first() {
        let deps = graph(&[("ui", &["jquery"]), ("bootstrap", &["ui", "jquery"])]);
        let order = topological_sort(["bootstrap"], |n| *n, deps).unwrap();
        assert_eq!(order, ["jquery", "ui", "bootstrap"]);
    }

    #[test]
    fn test_dedup_and_stable_order() {
        let deps = graph(&[("a", &["shared"]), ("b", &["shared"])]);
        let order = topological_sort(["a", "b", "a", "c"], |n| *n, deps).unwrap();
        assert_eq!(order, ["shared", "a", "b", "c"]);
    }

    #[test]
    fn test_dependency_declaration_order() {
        let deps = graph(&[("app", &["y", "x"])]);
        let order = topological_sort(["x", "app"], |n| *n, deps).unwrap();
        assert_eq!(order, ["x", "y", "app"]);
    }

    #[test]
    fn test_cycle() {
        let deps = graph(&[("a", &["b"]), ("b", &["c"]), ("c", &["a"])]);
        let cycle = topological_sort(["a"], |n| *n, deps).unwrap_err();
        assert_eq!(cycle, ["a", "b", "c", "a"]);
    }

    #[test]
    fn test_self_cycle() {
        let deps = graph(&[("a", &["a"])]);
        let cycle = topological_sort(["a"], |n| *n, deps).unwrap_err();
        assert_eq!(cycle, ["a", "a"]);
    }

    #[test]
    fn test_empty() {
        let order = topological_sort(Vec::<&str>::new(), |n| *n, |_| Vec::new()).unwrap();
        assert!(order.is_empty());
    }
}
