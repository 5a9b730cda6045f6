//! Indent-tree builder.
//!
//! CONTROLS, ACTIONS, and XMLport ELEMENTS all arrive as a flat ordered
//! list of entries tagged with an integer indent level; the forest
//! structure is implied. [`build_forest`] reconstructs it with a stack:
//! for each entry, pop frames whose level is >= the entry's level, then
//! attach the entry to the surviving top (or the root list) and push it.
//!
//! Resulting invariants: every child's level is strictly greater than its
//! parent's; siblings share a level; a jump from a deep level back to a
//! shallow one pops all intermediate frames; consecutive entries at the
//! deepest level accumulate as siblings.

/// An entry that can be positioned in an indent forest.
pub trait IndentNode: Sized {
    /// The entry's indent level as written in source.
    fn indent_level(&self) -> u32;

    /// The entry's child list, appended to by the builder.
    fn children_mut(&mut self) -> &mut Vec<Self>;
}

/// Build a forest from a flat, source-ordered entry list.
pub fn build_forest<T: IndentNode>(entries: Vec<T>) -> Vec<T> {
    let mut roots: Vec<T> = Vec::new();
    // Each frame is (indent level, index of the node within its sibling
    // list). The frames spell out the path from the roots to the node
    // most recently attached at each depth.
    let mut stack: Vec<(u32, usize)> = Vec::new();

    for entry in entries {
        let level = entry.indent_level();

        while let Some(&(top_level, _)) = stack.last() {
            if top_level >= level {
                stack.pop();
            } else {
                break;
            }
        }

        let siblings = {
            let mut list = &mut roots;
            for &(_, index) in &stack {
                list = list[index].children_mut();
            }
            list
        };
        siblings.push(entry);
        let index = siblings.len() - 1;
        stack.push((level, index));
    }

    roots
}
