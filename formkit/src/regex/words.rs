use crate::regex::node::RegexNode;
use crate::symbol::Symbol;

/// Whether some literal occurs in the tree, i.e. the node can contribute symbols
fn produces_symbols(node: &RegexNode) -> bool {
    let mut pending = vec![node];
    while let Some(node) = pending.pop() {
        match node {
            RegexNode::Literal(_) => return true,
            RegexNode::Concat(children) | RegexNode::Union(children) => {
                pending.extend(children.iter())
            }
            RegexNode::Star(inner) => pending.push(inner),
            RegexNode::Empty | RegexNode::Epsilon => {}
        }
    }
    false
}

/// The `n`-th word of the family generated by the tree: every star repeats its body
/// `n` times and every union takes its first alternative able to contribute symbols
/// (its first alternative when none can). Words grow with `n` whenever a star has a
/// body containing a literal.
///
/// The result is a member of the language unless the tree contains `∅`, which
/// contributes nothing.
pub fn nth_word(root: &RegexNode, n: usize) -> Vec<Symbol> {
    let mut word = Vec::new();
    let mut pending = vec![root];
    while let Some(node) = pending.pop() {
        match node {
            RegexNode::Empty | RegexNode::Epsilon => {}
            RegexNode::Literal(name) => word.push(Symbol::new(name)),
            RegexNode::Concat(children) => pending.extend(children.iter().rev()),
            RegexNode::Union(children) => pending.extend(
                children
                    .iter()
                    .find(|child| produces_symbols(child))
                    .or_else(|| children.first()),
            ),
            RegexNode::Star(inner) => pending.extend(std::iter::repeat(inner.as_ref()).take(n)),
        }
    }
    word
}
