use std::collections::{BTreeMap, BTreeSet};

use crate::fa::state::IndexedState;
use crate::symbol::{Symbol, EPSILON};

/// A pushdown edge: the destination, the value required on top of the stack
/// (popped when firing) and the value pushed afterwards.
#[derive(Debug, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct PDATransition {
    pub to: usize,
    pub push: Option<Symbol>, // None pushes nothing
    pub pop: Option<Symbol>,  // None fires regardless of the stack
}

impl PDATransition {
    pub fn new(to: usize, push: Option<Symbol>, pop: Option<Symbol>) -> Self {
        PDATransition { to, push, pop }
    }

    /// Whether the edge may fire with `top` on top of the stack
    pub fn pop_matches(&self, top: Option<&Symbol>) -> bool {
        match &self.pop {
            None => true,
            Some(required) => top == Some(required),
        }
    }

    pub(crate) fn label(&self, symbol: &Symbol) -> String {
        let show = |value: &Option<Symbol>| {
            value
                .as_ref()
                .map_or_else(|| EPSILON.to_string(), |s| s.to_string())
        };
        format!("{}, {}/{}", symbol, show(&self.push), show(&self.pop))
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PDAState {
    pub index: usize,
    pub identifier: String,
    pub is_terminal: bool,
    pub transitions: BTreeMap<Symbol, BTreeSet<PDATransition>>, // input symbol or epsilon
}

impl PDAState {
    pub fn new(index: usize, is_terminal: bool) -> Self {
        PDAState::with_identifier(index, &index.to_string(), is_terminal)
    }

    pub fn with_identifier(index: usize, identifier: &str, is_terminal: bool) -> Self {
        PDAState {
            index,
            identifier: identifier.to_string(),
            is_terminal,
            transitions: BTreeMap::new(),
        }
    }

    pub fn set_transition(&mut self, transition: PDATransition, symbol: Symbol) {
        self.transitions.entry(symbol).or_default().insert(transition);
    }

    /// Edges keyed by `symbol`
    pub fn transitions_on(&self, symbol: &Symbol) -> impl Iterator<Item = &PDATransition> + '_ {
        self.transitions.get(symbol).into_iter().flatten()
    }

    pub fn edges(&self) -> impl Iterator<Item = (&Symbol, &PDATransition)> + '_ {
        self.transitions
            .iter()
            .flat_map(|(symbol, transitions)| transitions.iter().map(move |t| (symbol, t)))
    }

    pub fn label(&self) -> String {
        if self.identifier.is_empty() {
            self.index.to_string()
        } else {
            self.identifier.clone()
        }
    }
}

impl IndexedState for PDAState {
    fn index(&self) -> usize {
        self.index
    }

    fn destinations(&self) -> Box<dyn Iterator<Item = usize> + '_> {
        Box::new(self.edges().map(|(_, transition)| transition.to))
    }
}
