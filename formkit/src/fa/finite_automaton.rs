use std::collections::{BTreeSet, VecDeque};

use hashbrown::{HashMap, HashSet};
use once_cell::sync::OnceCell;

use crate::description::AutomatonDescription;
use crate::error::{FormError, FormResult};
use crate::fa::state::{FAState, IndexedState};
use crate::fa::transformation_monoid::TransformationMonoid;
use crate::kind::ObjectKind;
use crate::language::{self, with_language, LanguageId, LanguageLink, MinDfa};
use crate::recognizer::Recognizer;
use crate::symbol::Symbol;

/// Quotes a label for the textual graph form
fn quote_label(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Textual graph form shared by every automaton flavour. Nodes are
/// `(index, label, is_terminal)`, edges `(from, to, label)`.
pub(crate) fn txt_graph(
    initial_state: usize,
    nodes: impl IntoIterator<Item = (usize, String, bool)>,
    edges: impl IntoIterator<Item = (usize, usize, String)>,
) -> String {
    let mut output =
        String::from("digraph {\n\trankdir = LR\n\tdummy [label = \"\", shape = none]\n");
    for (index, label, is_terminal) in nodes {
        output.push_str(&format!(
            "\t{} [label = \"{}\", shape = {}]\n",
            index,
            quote_label(&label),
            if is_terminal { "doublecircle" } else { "circle" }
        ));
    }
    output.push_str(&format!("\tdummy -> {}\n", initial_state));
    for (from, to, label) in edges {
        output.push_str(&format!(
            "\t{} -> {} [label = \"{}\"]\n",
            from,
            to,
            quote_label(&label)
        ));
    }
    output.push_str("}\n");
    output
}

/// A finite automaton. Deterministic automata are the ones satisfying
/// [`FiniteAutomaton::is_deterministic`]; there is no separate type for them.
///
/// Values are immutable once built: every algorithm returns a new automaton.
#[derive(Debug, Clone)]
pub struct FiniteAutomaton {
    pub(crate) initial_state: usize,
    pub(crate) states: Vec<FAState>,
    pub(crate) alphabet: BTreeSet<Symbol>, // never contains epsilon
    pub(crate) language: OnceCell<LanguageLink>,
}

/// Checks the structural invariants shared by every automaton flavour: a state's
/// index equals its position, destinations exist and the initial state exists.
pub(crate) fn validate_structure<S: IndexedState>(
    initial_state: usize,
    states: &[S],
) -> FormResult<()> {
    for (position, state) in states.iter().enumerate() {
        let index = state.index();
        if index != position {
            return Err(FormError::StateIndexMismatch { position, index });
        }
        if let Some(to) = state.destinations().find(|&to| to >= states.len()) {
            return Err(FormError::DanglingTransition { from: index, to });
        }
    }
    if initial_state >= states.len() {
        return Err(FormError::InvalidInitialState {
            initial: initial_state,
            states: states.len(),
        });
    }
    Ok(())
}

impl FiniteAutomaton {
    /// Creates a new automaton, checking its structural invariants.
    /// Literal symbols used by transitions are added to the alphabet.
    pub fn try_new(
        initial_state: usize,
        states: Vec<FAState>,
        alphabet: BTreeSet<Symbol>,
    ) -> FormResult<Self> {
        if alphabet.contains(&Symbol::Epsilon) {
            return Err(FormError::EpsilonInAlphabet);
        }
        if alphabet.contains(&Symbol::new("")) {
            return Err(FormError::EmptySymbolName);
        }
        validate_structure(initial_state, &states)?;
        let mut alphabet = alphabet;
        for state in &states {
            for (symbol, to) in state.edges() {
                match symbol {
                    Symbol::Ref(_) => {
                        return Err(FormError::MemoryTransitionInFa {
                            from: state.label(),
                            to: states[to].label(),
                        })
                    }
                    Symbol::Literal(name) if name.is_empty() => {
                        return Err(FormError::EmptySymbolName)
                    }
                    Symbol::Literal(_) => {
                        alphabet.insert(symbol.clone());
                    }
                    Symbol::Epsilon => {}
                }
            }
        }
        Ok(FiniteAutomaton::from_parts(
            initial_state,
            states,
            alphabet,
            OnceCell::new(),
        ))
    }

    /// Creates a new automaton.
    ///
    /// # Panics
    /// If the states violate the structural invariants (see [`FiniteAutomaton::try_new`]).
    pub fn new(initial_state: usize, states: Vec<FAState>, alphabet: BTreeSet<Symbol>) -> Self {
        FiniteAutomaton::try_new(initial_state, states, alphabet)
            .unwrap_or_else(|error| panic!("invalid finite automaton: {}", error))
    }

    /// Assembles an automaton produced by an algorithm of this crate
    pub(crate) fn from_parts(
        initial_state: usize,
        states: Vec<FAState>,
        alphabet: BTreeSet<Symbol>,
        language: OnceCell<LanguageLink>,
    ) -> Self {
        debug_assert!(states.iter().enumerate().all(|(i, s)| s.index == i));
        debug_assert!(initial_state < states.len());
        FiniteAutomaton {
            initial_state,
            states,
            alphabet,
            language,
        }
    }

    /// Builds an automaton from structural input. States are numbered in sorted
    /// name order; without an initial marker the first state is initial.
    pub fn from_description(description: &AutomatonDescription) -> FormResult<Self> {
        let (names, initial_state) = description.numbering();
        let index_of: HashMap<&str, usize> = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.as_str(), i))
            .collect();
        let mut states: Vec<FAState> = names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                FAState::with_identifier(i, description.label(name), description.is_terminal(name))
            })
            .collect();
        let mut alphabet = BTreeSet::new();
        for transition in description.transitions() {
            let symbol = Symbol::from_token(&transition.symbol);
            if symbol.is_ref() || !transition.open.is_empty() || !transition.close.is_empty() {
                return Err(FormError::MemoryTransitionInFa {
                    from: transition.from.clone(),
                    to: transition.to.clone(),
                });
            }
            if symbol.is_literal() {
                alphabet.insert(symbol.clone());
            }
            states[index_of[transition.from.as_str()]]
                .set_transition(index_of[transition.to.as_str()], symbol);
        }
        FiniteAutomaton::try_new(initial_state, states, alphabet)
    }

    pub fn initial_state(&self) -> usize {
        self.initial_state
    }

    pub fn states(&self) -> &[FAState] {
        &self.states
    }

    pub fn state(&self, index: usize) -> &FAState {
        &self.states[index]
    }

    pub fn alphabet(&self) -> &BTreeSet<Symbol> {
        &self.alphabet
    }

    /// Number of states
    pub fn size(&self) -> usize {
        self.states.len()
    }

    pub fn terminal_states(&self) -> BTreeSet<usize> {
        self.states
            .iter()
            .filter(|state| state.is_terminal)
            .map(|state| state.index)
            .collect()
    }

    pub fn has_epsilon_transitions(&self) -> bool {
        self.states
            .iter()
            .any(|state| state.transitions.contains_key(&Symbol::Epsilon))
    }

    /// No epsilon transitions and at most one destination per symbol and state
    pub fn is_deterministic(&self) -> bool {
        !self.has_epsilon_transitions()
            && self
                .states
                .iter()
                .all(|state| state.transitions.values().all(|targets| targets.len() <= 1))
    }

    pub fn kind(&self) -> ObjectKind {
        if self.is_deterministic() {
            ObjectKind::Dfa
        } else {
            ObjectKind::Nfa
        }
    }

    /// Returns the set of states reachable from `state`, epsilon transitions included
    pub fn reachable_states(&self, state: usize) -> HashSet<usize> {
        let mut reachable: HashSet<usize> = HashSet::from([state]);
        let mut stack = vec![state];
        while let Some(current) = stack.pop() {
            for (_, next) in self.states[current].edges() {
                if reachable.insert(next) {
                    stack.push(next);
                }
            }
        }
        reachable
    }

    /// Returns the set of states from which some terminal state is reachable
    pub fn leading_to_terminal_states(&self) -> HashSet<usize> {
        let mut inverted: Vec<Vec<usize>> = vec![Vec::new(); self.states.len()];
        for state in &self.states {
            for (_, to) in state.edges() {
                inverted[to].push(state.index);
            }
        }
        let mut leading: HashSet<usize> = self.terminal_states().into_iter().collect();
        let mut stack: Vec<usize> = leading.iter().copied().collect();
        while let Some(current) = stack.pop() {
            for &previous in &inverted[current] {
                if leading.insert(previous) {
                    stack.push(previous);
                }
            }
        }
        leading
    }

    /// Whether the automaton accepts no word at all
    pub fn is_empty(&self) -> bool {
        self.reachable_states(self.initial_state)
            .iter()
            .all(|&state| !self.states[state].is_terminal)
    }

    /// A shortest accepted word, if any
    pub fn shortest_word(&self) -> Option<Vec<Symbol>> {
        let automaton = self.remove_eps();
        let mut parent: HashMap<usize, (usize, Symbol)> = HashMap::new();
        let mut seen: HashSet<usize> = HashSet::from([automaton.initial_state]);
        let mut queue = VecDeque::from([automaton.initial_state]);
        while let Some(current) = queue.pop_front() {
            if automaton.states[current].is_terminal {
                let mut word = Vec::new();
                let mut state = current;
                while let Some((previous, symbol)) = parent.get(&state) {
                    word.push(symbol.clone());
                    state = *previous;
                }
                word.reverse();
                return Some(word);
            }
            for (symbol, next) in automaton.states[current].edges() {
                if seen.insert(next) {
                    parent.insert(next, (current, symbol.clone()));
                    queue.push_back(next);
                }
            }
        }
        None
    }

    /// Nondeterministic membership test of a word given as text, one symbol per character
    pub fn parsing_by_nfa(&self, word: &str) -> bool {
        self.accepts_string(word)
    }

    /// Canonical textual graph form
    pub fn to_txt(&self) -> String {
        txt_graph(
            self.initial_state,
            self.states
                .iter()
                .map(|state| (state.index, state.label(), state.is_terminal)),
            self.states.iter().flat_map(|state| {
                state
                    .edges()
                    .map(move |(symbol, to)| (state.index, to, symbol.to_string()))
            }),
        )
    }

    /// Identifier of this automaton's language, registering one if needed
    pub fn language_id(&self) -> LanguageId {
        language::attach(&self.language, || self.alphabet.clone())
    }

    pub fn language_link(&self) -> Option<&LanguageLink> {
        self.language.get()
    }

    /// The minimal DFA of the language, memoized in the language cache
    pub fn minimal_dfa(&self) -> FiniteAutomaton {
        let id = self.language_id();
        let cached = with_language(id, |language| {
            language
                .is_min_dfa_cached()
                .then(|| language.get_min_dfa().clone())
        })
        .flatten();
        if let Some(min_dfa) = cached {
            return FiniteAutomaton::from_parts(
                min_dfa.initial_state,
                min_dfa.states,
                min_dfa.alphabet,
                OnceCell::with_value(LanguageLink::Shared(id)),
            );
        }

        let minimal = self.determinize().minimize();
        let min_dfa = MinDfa {
            initial_state: minimal.initial_state,
            states: minimal.states.clone(),
            alphabet: minimal.alphabet.clone(),
        };
        with_language(id, |language| language.set_min_dfa(min_dfa));
        minimal
    }

    /// Transformation monoid of the minimal complete DFA, memoized in the language cache
    pub fn syntactic_monoid(&self) -> TransformationMonoid {
        let id = self.language_id();
        let cached = with_language(id, |language| {
            language
                .is_syntactic_monoid_cached()
                .then(|| language.get_syntactic_monoid().clone())
        })
        .flatten();
        if let Some(monoid) = cached {
            return monoid;
        }

        let monoid = TransformationMonoid::of(&self.minimal_dfa());
        with_language(id, |language| language.set_syntactic_monoid(monoid.clone()));
        monoid
    }

    /// Pumping-lemma bound: the state count of the minimal trim DFA
    pub fn pump_length(&self) -> usize {
        let id = self.language_id();
        if let Some(Some(length)) = with_language(id, |language| {
            language
                .is_pump_length_cached()
                .then(|| language.get_pump_length())
        }) {
            return length;
        }

        let length = self.minimal_dfa().size();
        with_language(id, |language| language.set_pump_length(length));
        length
    }
}

impl Recognizer for FiniteAutomaton {
    /// Simulates the automaton on all paths at once
    fn accepts(&self, input: &[Symbol]) -> bool {
        let mut current = self.epsilon_closure_of([self.initial_state]);
        for symbol in input {
            let next: Vec<usize> = current
                .iter()
                .flat_map(|&state| self.states[state].next_on(symbol))
                .collect();
            if next.is_empty() {
                return false;
            }
            current = self.epsilon_closure_of(next);
        }
        current.iter().any(|&state| self.states[state].is_terminal)
    }
}
