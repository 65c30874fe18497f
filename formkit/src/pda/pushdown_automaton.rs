use std::collections::BTreeSet;

use log::{debug, trace};
use once_cell::sync::OnceCell;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::error::{FormError, FormResult};
use crate::fa::finite_automaton::{txt_graph, validate_structure};
use crate::language::{self, LanguageId, LanguageLink};
use crate::pda::state::{PDAState, PDATransition};
use crate::recognizer::Recognizer;
use crate::symbol::{symbols_of, Symbol};

type Stack = SmallVec<[Symbol; 8]>;

/// Bounds on the backtracking search of [`PushdownAutomaton::parse_with_limits`]
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct ParseLimits {
    pub max_steps: Option<usize>, // None: search until the work list is empty
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct ParseOutcome {
    pub steps: usize, // configurations taken from the work list
    pub accepted: bool,
    pub exhausted: bool, // the step limit stopped the search before a verdict
}

/// One point of the search: input position, control state and stack contents
#[derive(Debug, Clone)]
struct Configuration {
    position: usize,
    state: usize,
    stack: Stack,
}

impl Configuration {
    fn fire(&self, transition: &PDATransition, consumed: usize) -> Configuration {
        let mut stack = self.stack.clone();
        if transition.pop.is_some() {
            stack.pop();
        }
        if let Some(push) = &transition.push {
            stack.push(push.clone());
        }
        Configuration {
            position: self.position + consumed,
            state: transition.to,
            stack,
        }
    }
}

/// A nondeterministic pushdown automaton accepting by terminal state with the whole
/// input consumed
#[derive(Debug, Clone)]
pub struct PushdownAutomaton {
    initial_state: usize,
    states: Vec<PDAState>,
    alphabet: BTreeSet<Symbol>,
    language: OnceCell<LanguageLink>,
}

impl PushdownAutomaton {
    /// Creates a pushdown automaton, checking the structural invariants.
    /// Input symbols used by transitions are added to the alphabet.
    pub fn try_new(
        initial_state: usize,
        states: Vec<PDAState>,
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
        Ok(PushdownAutomaton {
            initial_state,
            states,
            alphabet,
            language: OnceCell::new(),
        })
    }

    /// # Panics
    /// If the states violate the structural invariants.
    pub fn new(initial_state: usize, states: Vec<PDAState>, alphabet: BTreeSet<Symbol>) -> Self {
        PushdownAutomaton::try_new(initial_state, states, alphabet)
            .unwrap_or_else(|error| panic!("invalid pushdown automaton: {}", error))
    }

    pub fn initial_state(&self) -> usize {
        self.initial_state
    }

    pub fn states(&self) -> &[PDAState] {
        &self.states
    }

    pub fn alphabet(&self) -> &BTreeSet<Symbol> {
        &self.alphabet
    }

    pub fn size(&self) -> usize {
        self.states.len()
    }

    /// Every value pushed or required on the stack by some transition
    pub fn stack_alphabet(&self) -> BTreeSet<Symbol> {
        self.states
            .iter()
            .flat_map(|state| state.edges())
            .flat_map(|(_, transition)| [&transition.push, &transition.pop])
            .filter_map(|value| value.clone())
            .collect()
    }

    pub fn language_id(&self) -> LanguageId {
        language::attach(&self.language, || self.alphabet.clone())
    }

    /// Membership of a word given as text, one symbol per character.
    /// Returns the number of explored configurations and the verdict.
    pub fn parse(&self, input: &str) -> (usize, bool) {
        let outcome = self.parse_with_limits(&symbols_of(input), ParseLimits::default());
        (outcome.steps, outcome.accepted)
    }

    /// Backtracking search over configurations, depth first.
    ///
    /// Symbol edges fire when their pop requirement matches the top of the stack (or
    /// is absent) and consume one symbol. Epsilon edges fire under the same rule
    /// without consuming input; each (position, source, destination) epsilon move is
    /// explored once, and entries for positions beyond the one the search returns to
    /// are forgotten.
    ///
    /// The key ignores the stack. A second arrival at the same epsilon move with a
    /// different stack is skipped, so a word whose only accepting run needs that
    /// second arrival is rejected.
    pub fn parse_with_limits(&self, input: &[Symbol], limits: ParseLimits) -> ParseOutcome {
        let mut visited_epsilon: FxHashSet<(usize, usize, usize)> = FxHashSet::default();
        let mut to_process = vec![Configuration {
            position: 0,
            state: self.initial_state,
            stack: Stack::new(),
        }];
        let mut steps = 0;

        while let Some(configuration) = to_process.pop() {
            if limits.max_steps.is_some_and(|max| steps >= max) {
                debug!("parse stopped after {} steps", steps);
                return ParseOutcome {
                    steps,
                    accepted: false,
                    exhausted: true,
                };
            }
            steps += 1;
            let state = &self.states[configuration.state];
            trace!(
                "step {}: state {} at position {} with stack depth {}",
                steps,
                state.label(),
                configuration.position,
                configuration.stack.len()
            );

            if state.is_terminal && configuration.position == input.len() {
                debug!("input accepted after {} steps", steps);
                return ParseOutcome {
                    steps,
                    accepted: true,
                    exhausted: false,
                };
            }

            let top = configuration.stack.last();
            if let Some(symbol) = input.get(configuration.position) {
                for transition in state.transitions_on(symbol) {
                    if transition.pop_matches(top) {
                        to_process.push(configuration.fire(transition, 1));
                    }
                }
            }

            visited_epsilon.retain(|&(position, _, _)| position <= configuration.position);
            for transition in state.transitions_on(&Symbol::Epsilon) {
                let key = (configuration.position, configuration.state, transition.to);
                if transition.pop_matches(top) && visited_epsilon.insert(key) {
                    to_process.push(configuration.fire(transition, 0));
                }
            }
        }

        debug!("input rejected after {} steps", steps);
        ParseOutcome {
            steps,
            accepted: false,
            exhausted: false,
        }
    }

    /// Canonical textual graph form; edge labels read `symbol, push/pop`
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

impl Recognizer for PushdownAutomaton {
    fn accepts(&self, input: &[Symbol]) -> bool {
        self.parse_with_limits(input, ParseLimits::default()).accepted
    }
}
