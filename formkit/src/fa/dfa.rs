use std::collections::{BTreeMap, VecDeque};

use hashbrown::HashSet;
use log::{debug, trace};
use once_cell::sync::OnceCell;
use rustc_hash::FxHashMap;

use crate::fa::finite_automaton::FiniteAutomaton;
use crate::fa::state::FAState;
use crate::language;
use crate::symbol::Symbol;

const SINK_IDENTIFIER: &str = "sink";

impl FiniteAutomaton {
    /// Returns the minimal trim DFA of this deterministic automaton, canonically
    /// numbered (see [`FiniteAutomaton::canonical_relabel`]).
    ///
    /// Unreachable states and states that cannot reach a terminal state are dropped,
    /// then blocks of the partition {terminal, non-terminal} are split until all
    /// members of each block agree on the block of their successor per symbol. The
    /// empty language minimizes to a single non-terminal state.
    ///
    /// The caller must pass a deterministic automaton without epsilon transitions
    /// (apply [`FiniteAutomaton::determinize`] first); other inputs give unspecified
    /// results.
    pub fn minimize(&self) -> FiniteAutomaton {
        debug_assert!(
            self.is_deterministic(),
            "minimize expects a deterministic automaton without epsilon transitions"
        );

        let reachable = self.reachable_states(self.initial_state);
        let leading = self.leading_to_terminal_states();
        if !leading.contains(&self.initial_state) {
            let label = self.states[self.initial_state].label();
            let empty = FAState::with_identifier(0, &label, false);
            return FiniteAutomaton::from_parts(
                0,
                vec![empty],
                self.alphabet.clone(),
                language::derived(&self.language),
            );
        }
        let useful: Vec<usize> = (0..self.states.len())
            .filter(|state| reachable.contains(state) && leading.contains(state))
            .collect();
        let useful_set: HashSet<usize> = useful.iter().copied().collect();
        let successor = |state: usize, symbol: &Symbol| -> Option<usize> {
            self.states[state]
                .next_on(symbol)
                .next()
                .filter(|next| useful_set.contains(next))
        };

        let mut blocks: Vec<usize> = self
            .states
            .iter()
            .map(|state| usize::from(!state.is_terminal))
            .collect();
        let mut block_count = 0;
        loop {
            let mut signatures: FxHashMap<(usize, Vec<Option<usize>>), usize> =
                FxHashMap::default();
            let mut refined = blocks.clone();
            for &state in &useful {
                let successors: Vec<Option<usize>> = self
                    .alphabet
                    .iter()
                    .map(|symbol| successor(state, symbol).map(|next| blocks[next]))
                    .collect();
                let next_id = signatures.len();
                refined[state] = *signatures
                    .entry((blocks[state], successors))
                    .or_insert(next_id);
            }
            trace!("minimization round: {} blocks", signatures.len());

            let stable = signatures.len() == block_count;
            block_count = signatures.len();
            blocks = refined;
            if stable {
                break;
            }
        }

        // One state per block, then a canonical renumbering
        let mut members: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for &state in &useful {
            members.entry(blocks[state]).or_default().push(state);
        }
        let mut states: Vec<FAState> = members
            .iter()
            .map(|(&block, group)| {
                let identifier = group
                    .iter()
                    .map(|&state| self.states[state].label())
                    .collect::<Vec<_>>()
                    .join(", ");
                FAState::with_identifier(block, &identifier, self.states[group[0]].is_terminal)
            })
            .collect();
        for (&block, group) in &members {
            for symbol in &self.alphabet {
                if let Some(next) = successor(group[0], symbol) {
                    states[block].set_transition(blocks[next], symbol.clone());
                }
            }
        }
        debug!(
            "minimized {} states into {} states",
            self.states.len(),
            states.len()
        );

        FiniteAutomaton::from_parts(
            blocks[self.initial_state],
            states,
            self.alphabet.clone(),
            language::derived(&self.language),
        )
        .canonical_relabel()
    }

    /// Renumbers the reachable states in breadth-first order from the initial state,
    /// following transitions in symbol order. Unreachable states are dropped.
    ///
    /// Two deterministic automata that differ only by a state relabeling have the
    /// same canonical form.
    pub fn canonical_relabel(&self) -> FiniteAutomaton {
        let mut numbering: FxHashMap<usize, usize> = FxHashMap::default();
        let mut order = vec![self.initial_state];
        numbering.insert(self.initial_state, 0);
        let mut to_process = VecDeque::from([self.initial_state]);
        while let Some(current) = to_process.pop_front() {
            for (_, next) in self.states[current].edges() {
                if !numbering.contains_key(&next) {
                    numbering.insert(next, order.len());
                    order.push(next);
                    to_process.push_back(next);
                }
            }
        }

        let states = order
            .iter()
            .enumerate()
            .map(|(index, &old)| {
                let source = &self.states[old];
                let mut state =
                    FAState::with_identifier(index, &source.identifier, source.is_terminal);
                for (symbol, to) in source.edges() {
                    state.set_transition(numbering[&to], symbol.clone());
                }
                state
            })
            .collect();

        FiniteAutomaton::from_parts(
            0,
            states,
            self.alphabet.clone(),
            language::derived(&self.language),
        )
    }

    /// Whether every state has a transition on every symbol of the alphabet
    pub fn is_complete(&self) -> bool {
        self.states.iter().all(|state| {
            self.alphabet
                .iter()
                .all(|symbol| state.transitions.contains_key(symbol))
        })
    }

    /// Adds a non-terminal sink state absorbing every missing transition.
    /// Complete automata are returned unchanged.
    pub fn complete(&self) -> FiniteAutomaton {
        if self.is_complete() {
            return self.clone();
        }
        let sink = self.states.len();
        let mut states = self.states.clone();
        states.push(FAState::with_identifier(sink, SINK_IDENTIFIER, false));
        for state in states.iter_mut() {
            for symbol in &self.alphabet {
                if !state.transitions.contains_key(symbol) {
                    state.set_transition(sink, symbol.clone());
                }
            }
        }

        FiniteAutomaton::from_parts(
            self.initial_state,
            states,
            self.alphabet.clone(),
            language::derived(&self.language),
        )
    }

    /// Returns a DFA accepting exactly the words over this alphabet that this one
    /// rejects. The automaton is completed with a sink first.
    ///
    /// The caller must pass a deterministic automaton without epsilon transitions.
    pub fn complement(&self) -> FiniteAutomaton {
        debug_assert!(
            self.is_deterministic(),
            "complement expects a deterministic automaton without epsilon transitions"
        );
        let complete = self.complete();
        let states = complete
            .states
            .into_iter()
            .map(|mut state| {
                state.is_terminal = !state.is_terminal;
                state
            })
            .collect();

        FiniteAutomaton::from_parts(
            complete.initial_state,
            states,
            complete.alphabet,
            OnceCell::new(),
        )
    }

    /// Product construction over the reachable pairs of states. A pair has an edge on
    /// a symbol iff both components do, and is terminal iff both components are.
    pub fn intersection(a: &FiniteAutomaton, b: &FiniteAutomaton) -> FiniteAutomaton {
        let a = if a.has_epsilon_transitions() {
            a.remove_eps()
        } else {
            a.clone()
        };
        let b = if b.has_epsilon_transitions() {
            b.remove_eps()
        } else {
            b.clone()
        };

        let pair_state = |index: usize, (p, q): (usize, usize)| {
            FAState::with_identifier(
                index,
                &format!("({}, {})", a.states[p].label(), b.states[q].label()),
                a.states[p].is_terminal && b.states[q].is_terminal,
            )
        };
        let start = (a.initial_state, b.initial_state);
        let mut pair_index: FxHashMap<(usize, usize), usize> = FxHashMap::default();
        pair_index.insert(start, 0);
        let mut states = vec![pair_state(0, start)];
        let mut to_process = VecDeque::from([start]);

        while let Some((p, q)) = to_process.pop_front() {
            let current = pair_index[&(p, q)];
            for (symbol, targets) in &a.states[p].transitions {
                let Some(other_targets) = b.states[q].transitions.get(symbol) else {
                    continue;
                };
                for &x in targets {
                    for &y in other_targets {
                        let target = match pair_index.get(&(x, y)) {
                            Some(&target) => target,
                            None => {
                                let target = states.len();
                                states.push(pair_state(target, (x, y)));
                                pair_index.insert((x, y), target);
                                to_process.push_back((x, y));
                                target
                            }
                        };
                        states[current].set_transition(target, symbol.clone());
                    }
                }
            }
        }
        debug!(
            "intersection of {} and {} states: {} reachable pairs",
            a.states.len(),
            b.states.len(),
            states.len()
        );

        let alphabet = a.alphabet.union(&b.alphabet).cloned().collect();
        FiniteAutomaton::from_parts(0, states, alphabet, OnceCell::new())
    }
}
