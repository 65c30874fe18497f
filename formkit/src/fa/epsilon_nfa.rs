use std::collections::BTreeSet;

use log::debug;

use crate::fa::finite_automaton::FiniteAutomaton;
use crate::fa::state::FAState;
use crate::language;
use crate::symbol::Symbol;

impl FiniteAutomaton {
    /// Epsilon-closure: all states reachable from the given ones using only ε-transitions
    pub(crate) fn epsilon_closure_of(
        &self,
        states: impl IntoIterator<Item = usize>,
    ) -> BTreeSet<usize> {
        let mut closure = BTreeSet::new();
        let mut stack = Vec::new();
        for state in states {
            if closure.insert(state) {
                stack.push(state);
            }
        }

        while let Some(state) = stack.pop() {
            for next in self.states[state].next_on(&Symbol::Epsilon) {
                if closure.insert(next) {
                    stack.push(next);
                }
            }
        }

        closure
    }

    /// Computes the epsilon-closure of a single state
    pub fn epsilon_closure(&self, state: usize) -> BTreeSet<usize> {
        self.epsilon_closure_of([state])
    }

    /// Computes an equivalent automaton without ε-transitions over the same states.
    ///
    /// Every state receives the non-epsilon transitions of its closure and becomes
    /// terminal if its closure contains a terminal state.
    pub fn remove_eps(&self) -> FiniteAutomaton {
        let mut states = Vec::with_capacity(self.states.len());
        for state in &self.states {
            let mut new_state = FAState::with_identifier(state.index, &state.identifier, false);
            for closure_state in self.epsilon_closure(state.index) {
                let source = &self.states[closure_state];
                new_state.is_terminal |= source.is_terminal;
                for (symbol, to) in source.edges() {
                    if !symbol.is_epsilon() {
                        new_state.set_transition(to, symbol.clone());
                    }
                }
            }
            states.push(new_state);
        }
        debug!("removed epsilon transitions over {} states", states.len());

        FiniteAutomaton::from_parts(
            self.initial_state,
            states,
            self.alphabet.clone(),
            language::derived(&self.language),
        )
    }
}
