use log::debug;
use smallvec::SmallVec;

use crate::fa::state::FAState;
use crate::regex::node::RegexNode;
use crate::symbol::Symbol;

/// A sub-automaton with a single entry and a single exit state
#[derive(Debug, Clone, Copy)]
struct Fragment {
    entry: usize,
    exit: usize,
}

#[derive(Debug, Default)]
struct Builder {
    states: Vec<FAState>,
}

impl Builder {
    fn add_state(&mut self) -> usize {
        let index = self.states.len();
        self.states.push(FAState::new(index, false));
        index
    }

    fn connect(&mut self, from: usize, to: usize, symbol: Symbol) {
        self.states[from].set_transition(to, symbol);
    }

    fn fragment(&mut self) -> Fragment {
        Fragment {
            entry: self.add_state(),
            exit: self.add_state(),
        }
    }

    fn leaf(&mut self, node: &RegexNode) -> Fragment {
        let fragment = self.fragment();
        match node {
            RegexNode::Epsilon => self.connect(fragment.entry, fragment.exit, Symbol::Epsilon),
            RegexNode::Literal(name) => {
                self.connect(fragment.entry, fragment.exit, Symbol::new(name))
            }
            _ => {}
        }
        fragment
    }

    fn concat(&mut self, parts: &[Fragment]) -> Fragment {
        let (Some(first), Some(last)) = (parts.first(), parts.last()) else {
            return self.leaf(&RegexNode::Epsilon);
        };
        for pair in parts.windows(2) {
            self.connect(pair[0].exit, pair[1].entry, Symbol::Epsilon);
        }
        Fragment {
            entry: first.entry,
            exit: last.exit,
        }
    }

    fn union(&mut self, parts: &[Fragment]) -> Fragment {
        let fragment = self.fragment();
        for part in parts {
            self.connect(fragment.entry, part.entry, Symbol::Epsilon);
            self.connect(part.exit, fragment.exit, Symbol::Epsilon);
        }
        fragment
    }

    fn star(&mut self, inner: Fragment) -> Fragment {
        let fragment = self.fragment();
        self.connect(fragment.entry, inner.entry, Symbol::Epsilon);
        self.connect(inner.exit, fragment.exit, Symbol::Epsilon);
        self.connect(fragment.entry, fragment.exit, Symbol::Epsilon);
        self.connect(inner.exit, inner.entry, Symbol::Epsilon);
        fragment
    }
}

/// Thompson construction. Returns the initial state and the states; the only
/// terminal state is the exit of the root fragment.
///
/// Every node contributes at most two states, so the automaton is linear in the
/// size of the tree.
pub(crate) fn thompson_states(root: &RegexNode) -> (usize, Vec<FAState>) {
    enum Visit<'a> {
        Enter(&'a RegexNode),
        Exit(&'a RegexNode),
    }

    let mut builder = Builder::default();
    let mut fragments: SmallVec<[Fragment; 16]> = SmallVec::new();
    let mut visits = vec![Visit::Enter(root)];
    while let Some(visit) = visits.pop() {
        match visit {
            Visit::Enter(node) => match node {
                RegexNode::Concat(children) | RegexNode::Union(children) => {
                    visits.push(Visit::Exit(node));
                    visits.extend(children.iter().rev().map(Visit::Enter));
                }
                RegexNode::Star(inner) => {
                    visits.push(Visit::Exit(node));
                    visits.push(Visit::Enter(inner));
                }
                leaf => {
                    let fragment = builder.leaf(leaf);
                    fragments.push(fragment);
                }
            },
            Visit::Exit(node) => {
                let fragment = match node {
                    RegexNode::Concat(children) => {
                        let start = fragments.len() - children.len();
                        let parts: SmallVec<[Fragment; 4]> = fragments.drain(start..).collect();
                        builder.concat(&parts)
                    }
                    RegexNode::Union(children) => {
                        let start = fragments.len() - children.len();
                        let parts: SmallVec<[Fragment; 4]> = fragments.drain(start..).collect();
                        builder.union(&parts)
                    }
                    RegexNode::Star(_) => match fragments.pop() {
                        Some(inner) => builder.star(inner),
                        None => builder.leaf(&RegexNode::Epsilon),
                    },
                    leaf => builder.leaf(leaf),
                };
                fragments.push(fragment);
            }
        }
    }

    let root_fragment = match fragments.pop() {
        Some(fragment) => fragment,
        None => builder.leaf(&RegexNode::Empty),
    };
    builder.states[root_fragment.exit].is_terminal = true;
    debug!(
        "thompson construction: {} nodes, {} states",
        root.size(),
        builder.states.len()
    );
    (root_fragment.entry, builder.states)
}
