use std::collections::{BTreeMap, BTreeSet};

use crate::symbol::Symbol;

/// A state of a finite automaton together with its outgoing transitions.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct FAState {
    pub index: usize,       // Must equal the position in the owning automaton
    pub identifier: String, // Human readable name
    pub is_terminal: bool,
    pub transitions: BTreeMap<Symbol, BTreeSet<usize>>, // symbol -> destinations
}

impl FAState {
    /// Creates a state without transitions, named after its index
    pub fn new(index: usize, is_terminal: bool) -> Self {
        FAState::with_identifier(index, &index.to_string(), is_terminal)
    }

    pub fn with_identifier(index: usize, identifier: &str, is_terminal: bool) -> Self {
        FAState {
            index,
            identifier: identifier.to_string(),
            is_terminal,
            transitions: BTreeMap::new(),
        }
    }

    /// Adds a transition to state `to` on `symbol`
    pub fn set_transition(&mut self, to: usize, symbol: Symbol) {
        self.transitions.entry(symbol).or_default().insert(to);
    }

    /// Destinations on `symbol`, empty if there are none
    pub fn next_on(&self, symbol: &Symbol) -> impl Iterator<Item = usize> + '_ {
        self.transitions
            .get(symbol)
            .into_iter()
            .flat_map(|targets| targets.iter().copied())
    }

    /// All (symbol, destination) pairs in canonical order
    pub fn edges(&self) -> impl Iterator<Item = (&Symbol, usize)> + '_ {
        self.transitions
            .iter()
            .flat_map(|(symbol, targets)| targets.iter().map(move |&to| (symbol, to)))
    }

    /// Label used in the textual graph form
    pub fn label(&self) -> String {
        if self.identifier.is_empty() {
            self.index.to_string()
        } else {
            self.identifier.clone()
        }
    }
}

/// Common view of the states of every automaton flavour, used for validation
pub(crate) trait IndexedState {
    fn index(&self) -> usize;

    fn destinations(&self) -> Box<dyn Iterator<Item = usize> + '_>;
}

impl IndexedState for FAState {
    fn index(&self) -> usize {
        self.index
    }

    fn destinations(&self) -> Box<dyn Iterator<Item = usize> + '_> {
        Box::new(self.edges().map(|(_, to)| to))
    }
}
