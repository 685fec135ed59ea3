use std::collections::HashSet;
use std::fmt::Write as _;

use crate::notifier::Notifier;

/// Renders the transitive dependency graph reachable from `roots` as
/// GraphViz dot source, styling an edge dotted when its downstream notifier
/// is inactive and solid when active. Diagnostic only; has no effect on
/// scheduling.
pub fn to_dot(roots: &[Notifier]) -> String {
    let mut out = String::from("digraph notifiers {\n");
    let mut seen: HashSet<usize> = HashSet::new();
    let mut stack: Vec<Notifier> = roots.to_vec();

    while let Some(notifier) = stack.pop() {
        let id = notifier_id(&notifier);
        if !seen.insert(id) {
            continue;
        }
        let _ = writeln!(
            out,
            "  n{} [label=\"{} (p{})\"{}];",
            id,
            escape(&notifier.name()),
            notifier.priority(),
            if notifier.active() { "" } else { ", style=dashed" }
        );
        for observer in notifier.observers_snapshot() {
            let style = if observer.active() { "solid" } else { "dotted" };
            let _ = writeln!(
                out,
                "  n{} -> n{} [style={}];",
                id,
                notifier_id(&observer),
                style
            );
            stack.push(observer);
        }
        for observed in notifier.observed_snapshot() {
            stack.push(observed);
        }
    }

    out.push_str("}\n");
    out
}

fn notifier_id(notifier: &Notifier) -> usize {
    notifier.downgrade().as_ptr() as *const () as usize
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
