//! Structural input for automaton construction, as produced by a text front end:
//! named states with optional aliases and markers, plus transition triples.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{FormError, FormResult};

/// A transition triple with optional memory-cell annotations
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TransitionDescription {
    pub from: String,
    pub to: String,
    pub symbol: String, // `eps` for epsilon, `&<n>` for a memory reference
    pub open: BTreeSet<usize>,
    pub close: BTreeSet<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct AutomatonDescription {
    names: BTreeSet<String>,
    labels: BTreeMap<String, String>,
    terminal: BTreeSet<String>,
    initial: Option<String>,
    transitions: Vec<TransitionDescription>,
}

impl AutomatonDescription {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_state(&mut self, name: &str) -> &mut Self {
        self.names.insert(name.to_string());
        self
    }

    /// Sets the alias shown for the state instead of its name
    pub fn set_label(&mut self, name: &str, label: &str) -> &mut Self {
        self.add_state(name);
        self.labels.insert(name.to_string(), label.to_string());
        self
    }

    pub fn mark_terminal(&mut self, name: &str) -> &mut Self {
        self.add_state(name);
        self.terminal.insert(name.to_string());
        self
    }

    /// Marks the initial state; only one state may carry the marker
    pub fn mark_initial(&mut self, name: &str) -> FormResult<&mut Self> {
        if self.initial.is_some() {
            return Err(FormError::SecondInitialState(name.to_string()));
        }
        self.add_state(name);
        self.initial = Some(name.to_string());
        Ok(self)
    }

    /// Adds a transition; endpoints not declared yet become states
    pub fn add_transition(&mut self, from: &str, to: &str, symbol: &str) -> &mut Self {
        self.add_memory_transition(from, to, symbol, BTreeSet::new(), BTreeSet::new())
    }

    pub fn add_memory_transition(
        &mut self,
        from: &str,
        to: &str,
        symbol: &str,
        open: BTreeSet<usize>,
        close: BTreeSet<usize>,
    ) -> &mut Self {
        self.add_state(from);
        self.add_state(to);
        self.transitions.push(TransitionDescription {
            from: from.to_string(),
            to: to.to_string(),
            symbol: symbol.to_string(),
            open,
            close,
        });
        self
    }

    /// State names in index order, and the index of the initial state (0 when no
    /// state is marked)
    pub fn numbering(&self) -> (Vec<String>, usize) {
        let names: Vec<String> = self.names.iter().cloned().collect();
        let initial = self
            .initial
            .as_ref()
            .and_then(|initial| names.iter().position(|name| name == initial))
            .unwrap_or(0);
        (names, initial)
    }

    /// The alias of a state, or its name when it has none
    pub fn label<'a>(&'a self, name: &'a str) -> &'a str {
        self.labels.get(name).map(String::as_str).unwrap_or(name)
    }

    pub fn is_terminal(&self, name: &str) -> bool {
        self.terminal.contains(name)
    }

    pub fn transitions(&self) -> &[TransitionDescription] {
        &self.transitions
    }
}
