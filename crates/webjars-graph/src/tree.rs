//! Dependency tree display.
//!
//! Formats a resolved resource as a human-readable ASCII tree:
//! ```text
//! jasmine-jquery v1.4.2
//! ├── jasmine v1.3.1
//! │   └── jquery v1.6.2
//! └── jquery v1.6.2 (shared)
//! ```

use std::collections::HashSet;

use crate::resource::WebJarResource;

/// Format a resolved resource and its dependencies.
pub fn format_tree(root: &WebJarResource<'_>) -> String {
    let mut out = format!("{} v{}\n", root.name(), root.version());
    let mut seen = HashSet::new();
    seen.insert(root.id().to_ascii_lowercase());

    let count = root.dependencies().len();
    for (i, dep) in root.dependencies().iter().enumerate() {
        format_dep(&mut out, dep, "", i == count - 1, &mut seen);
    }

    out.push_str(&format!(
        "\n{} dependencies ({} unique)\n",
        count_total_deps(root.dependencies()),
        seen.len() - 1
    ));
    out
}

fn format_dep(
    out: &mut String,
    dep: &WebJarResource<'_>,
    prefix: &str,
    is_last: bool,
    seen: &mut HashSet<String>,
) {
    let connector = if is_last { "└── " } else { "├── " };
    let shared = !seen.insert(dep.id().to_ascii_lowercase());
    let shared_marker = if shared { " (shared)" } else { "" };

    out.push_str(&format!(
        "{prefix}{connector}{} v{}{shared_marker}\n",
        dep.name(),
        dep.version()
    ));

    let child_prefix = if is_last {
        format!("{prefix}    ")
    } else {
        format!("{prefix}│   ")
    };

    let child_count = dep.dependencies().len();
    for (i, child) in dep.dependencies().iter().enumerate() {
        format_dep(out, child, &child_prefix, i == child_count - 1, seen);
    }
}

/// Count dependency nodes in the tree, duplicates included.
fn count_total_deps(deps: &[WebJarResource<'_>]) -> usize {
    deps.iter()
        .map(|dep| 1 + count_total_deps(dep.dependencies()))
        .sum()
}
