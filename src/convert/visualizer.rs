use crate::tree::{ConditionTree, NodeId, NodeRef};
use itertools::Itertools;
use std::fmt;

/// Renders `tree` as a box-drawing diagram, one line per node.
///
/// ```text
/// ROOT (AND)
/// ├─ status equals "Active"
/// └─ [OR] GROUP (OR)
///    ├─ location equals "A"
///    └─ location equals "B"
/// ```
///
/// Groups after the first sibling are prefixed with their connector. The first
/// item of a level has no incoming connector, so its tag is never shown.
pub fn generate_tree_visualization(tree: &ConditionTree) -> String {
    let mut lines = vec![format!("ROOT ({})", tree.internal_logic())];
    render_children(tree, None, "", &mut lines);
    lines.into_iter().join("\n")
}

fn render_children(
    tree: &ConditionTree,
    parent: Option<&NodeId>,
    prefix: &str,
    lines: &mut Vec<String>,
) {
    let children = tree.children(parent);
    if children.is_empty() {
        let marker = if parent.is_some() { "(empty group)" } else { "(empty)" };
        lines.push(format!("{}└─ {}", prefix, marker));
        return;
    }

    for (index, id) in children.iter().enumerate() {
        let Some(node) = tree.node(id) else {
            continue;
        };
        let is_last = index + 1 == children.len();
        let connector = if is_last { "└─ " } else { "├─ " };
        match node {
            NodeRef::Leaf { condition, .. } => {
                lines.push(format!("{}{}{}", prefix, connector, condition));
            }
            NodeRef::Group { id, group } => {
                let tag = if index > 0 {
                    format!("[{}] ", group.logic)
                } else {
                    String::new()
                };
                lines.push(format!(
                    "{}{}{}GROUP ({})",
                    prefix, connector, tag, group.internal_logic
                ));
                let child_prefix = format!("{}{}", prefix, if is_last { "   " } else { "│  " });
                render_children(tree, Some(id), &child_prefix, lines);
            }
        }
    }
}

impl fmt::Display for ConditionTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&generate_tree_visualization(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{GroupPath, Junction};

    #[test]
    fn test_empty_tree_shows_marker() {
        let rendered = generate_tree_visualization(&ConditionTree::new());
        assert_eq!(rendered, "ROOT (AND)\n└─ (empty)");
    }

    #[test]
    fn test_first_group_has_no_connector_tag() {
        let tree = ConditionTree::new().add_group(&GroupPath::root(), Junction::Or, false);
        let rendered = generate_tree_visualization(&tree);
        assert_eq!(rendered, "ROOT (AND)\n└─ GROUP (AND)\n   └─ (empty group)");

        let negated = ConditionTree::new().add_group(&GroupPath::root(), Junction::And, true);
        assert_eq!(
            generate_tree_visualization(&negated),
            "ROOT (AND)\n└─ GROUP (AND)\n   └─ (empty group)"
        );
    }
}
