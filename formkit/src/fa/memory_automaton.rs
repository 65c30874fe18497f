use std::collections::{BTreeMap, BTreeSet};

use hashbrown::HashMap;
use once_cell::sync::OnceCell;

use crate::description::AutomatonDescription;
use crate::error::{FormError, FormResult};
use crate::fa::finite_automaton::{txt_graph, validate_structure};
use crate::fa::state::IndexedState;
use crate::language::{self, LanguageId, LanguageLink};
use crate::symbol::Symbol;

/// An edge of a memory automaton: the destination and the memory cells opened and
/// closed while traversing it.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct MFATransition {
    pub to: usize,
    pub open: BTreeSet<usize>,
    pub close: BTreeSet<usize>,
}

impl MFATransition {
    /// A transition touching no memory cell
    pub fn new(to: usize) -> Self {
        MFATransition {
            to,
            open: BTreeSet::new(),
            close: BTreeSet::new(),
        }
    }

    pub fn with_memory(to: usize, open: BTreeSet<usize>, close: BTreeSet<usize>) -> Self {
        MFATransition { to, open, close }
    }

    fn label(&self, symbol: &Symbol) -> String {
        let cells = |ids: &BTreeSet<usize>| {
            ids.iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(" ")
        };
        let mut label = symbol.to_string();
        if !self.open.is_empty() {
            label.push_str(&format!(", o: {}", cells(&self.open)));
        }
        if !self.close.is_empty() {
            label.push_str(&format!(", c: {}", cells(&self.close)));
        }
        label
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct MFAState {
    pub index: usize,
    pub identifier: String,
    pub is_terminal: bool,
    pub transitions: BTreeMap<Symbol, BTreeSet<MFATransition>>,
}

impl MFAState {
    pub fn new(index: usize, is_terminal: bool) -> Self {
        MFAState::with_identifier(index, &index.to_string(), is_terminal)
    }

    pub fn with_identifier(index: usize, identifier: &str, is_terminal: bool) -> Self {
        MFAState {
            index,
            identifier: identifier.to_string(),
            is_terminal,
            transitions: BTreeMap::new(),
        }
    }

    pub fn set_transition(&mut self, transition: MFATransition, symbol: Symbol) {
        self.transitions.entry(symbol).or_default().insert(transition);
    }

    /// All (symbol, transition) pairs in canonical order
    pub fn edges(&self) -> impl Iterator<Item = (&Symbol, &MFATransition)> + '_ {
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

impl IndexedState for MFAState {
    fn index(&self) -> usize {
        self.index
    }

    fn destinations(&self) -> Box<dyn Iterator<Item = usize> + '_> {
        Box::new(self.edges().map(|(_, transition)| transition.to))
    }
}

/// A finite automaton whose edges may open and close memory cells and whose symbols
/// may refer back to a cell's captured value. Only construction and serialization
/// are provided.
#[derive(Debug, Clone)]
pub struct MemoryFiniteAutomaton {
    initial_state: usize,
    states: Vec<MFAState>,
    alphabet: BTreeSet<Symbol>, // literals and references, never epsilon
    language: OnceCell<LanguageLink>,
}

impl MemoryFiniteAutomaton {
    /// Creates a memory automaton, checking the same structural invariants as
    /// [`crate::fa::FiniteAutomaton::try_new`]. Non-epsilon symbols used by
    /// transitions are added to the alphabet.
    pub fn try_new(
        initial_state: usize,
        states: Vec<MFAState>,
        alphabet: BTreeSet<Symbol>,
    ) -> FormResult<Self> {
        if alphabet.contains(&Symbol::Epsilon) {
            return Err(FormError::EpsilonInAlphabet);
        }
        validate_structure(initial_state, &states)?;
        let mut alphabet = alphabet;
        for state in &states {
            alphabet.extend(state.transitions.keys().filter(|s| !s.is_epsilon()).cloned());
        }
        Ok(MemoryFiniteAutomaton {
            initial_state,
            states,
            alphabet,
            language: OnceCell::new(),
        })
    }

    /// # Panics
    /// If the states violate the structural invariants.
    pub fn new(initial_state: usize, states: Vec<MFAState>, alphabet: BTreeSet<Symbol>) -> Self {
        MemoryFiniteAutomaton::try_new(initial_state, states, alphabet)
            .unwrap_or_else(|error| panic!("invalid memory automaton: {}", error))
    }

    /// Builds a memory automaton from structural input, numbering states in sorted
    /// name order
    pub fn from_description(description: &AutomatonDescription) -> FormResult<Self> {
        let (names, initial_state) = description.numbering();
        let index_of: HashMap<&str, usize> = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.as_str(), i))
            .collect();
        let mut states: Vec<MFAState> = names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                MFAState::with_identifier(i, description.label(name), description.is_terminal(name))
            })
            .collect();
        for transition in description.transitions() {
            let edge = MFATransition::with_memory(
                index_of[transition.to.as_str()],
                transition.open.clone(),
                transition.close.clone(),
            );
            states[index_of[transition.from.as_str()]]
                .set_transition(edge, Symbol::from_token(&transition.symbol));
        }
        MemoryFiniteAutomaton::try_new(initial_state, states, BTreeSet::new())
    }

    pub fn initial_state(&self) -> usize {
        self.initial_state
    }

    pub fn states(&self) -> &[MFAState] {
        &self.states
    }

    pub fn alphabet(&self) -> &BTreeSet<Symbol> {
        &self.alphabet
    }

    pub fn size(&self) -> usize {
        self.states.len()
    }

    /// Every memory cell opened, closed or referenced anywhere in the automaton
    pub fn memory_cells(&self) -> BTreeSet<usize> {
        let mut cells = BTreeSet::new();
        for state in &self.states {
            for (symbol, transition) in state.edges() {
                if let Symbol::Ref(cell) = symbol {
                    cells.insert(*cell);
                }
                cells.extend(transition.open.iter().copied());
                cells.extend(transition.close.iter().copied());
            }
        }
        cells
    }

    pub fn language_id(&self) -> LanguageId {
        language::attach(&self.language, || self.alphabet.clone())
    }

    /// Canonical textual graph form; edge labels list opened (`o:`) and closed (`c:`)
    /// cells after the symbol
    pub fn to_txt(&self) -> String {
        txt_graph(
            self.initial_state,
            self.states
                .iter()
                .map(|state| (state.index, state.label(), state.is_terminal)),
            self.states.iter().flat_map(|state| {
                state.edges().map(move |(symbol, transition)| {
                    (state.index, transition.to, transition.label(symbol))
                })
            }),
        )
    }
}
