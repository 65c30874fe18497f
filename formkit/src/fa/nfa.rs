use std::collections::{BTreeMap, BTreeSet, VecDeque};

use log::{debug, trace};
use rustc_hash::FxHashMap;

use crate::fa::finite_automaton::FiniteAutomaton;
use crate::fa::state::FAState;
use crate::language;
use crate::symbol::Symbol;

/// Coarsest strong bisimulation over `states` (epsilon is treated as an ordinary
/// label). Returns the block number of every state; blocks are numbered in order of
/// their first member.
pub(crate) fn bisimulation_blocks(states: &[FAState]) -> Vec<usize> {
    let mut blocks: Vec<usize> = states
        .iter()
        .map(|state| usize::from(!state.is_terminal))
        .collect();
    let mut block_count = 0;
    let mut round = 0;

    loop {
        let mut signatures: FxHashMap<(usize, Vec<(&Symbol, BTreeSet<usize>)>), usize> =
            FxHashMap::default();
        let mut refined = Vec::with_capacity(states.len());
        for state in states {
            let successors: Vec<(&Symbol, BTreeSet<usize>)> = state
                .transitions
                .iter()
                .map(|(symbol, targets)| {
                    (symbol, targets.iter().map(|&to| blocks[to]).collect())
                })
                .collect();
            let next_id = signatures.len();
            let id = *signatures
                .entry((blocks[state.index], successors))
                .or_insert(next_id);
            refined.push(id);
        }
        round += 1;
        trace!("bisimulation round {}: {} blocks", round, signatures.len());

        // Blocks only ever split, so an unchanged count means the partition is stable
        let stable = signatures.len() == block_count;
        block_count = signatures.len();
        blocks = refined;
        if stable {
            break;
        }
    }

    debug!(
        "bisimulation of {} states: {} blocks after {} rounds",
        states.len(),
        block_count,
        round
    );
    blocks
}

impl FiniteAutomaton {
    /// Subset construction over the reachable subsets only.
    ///
    /// Epsilon transitions are removed first. Each synthesized state is terminal iff
    /// its subset contains a terminal state; the empty subset is never created.
    pub fn determinize(&self) -> FiniteAutomaton {
        let source = if self.has_epsilon_transitions() {
            self.remove_eps()
        } else {
            self.clone()
        };

        let start = BTreeSet::from([source.initial_state]);
        let mut subset_index: FxHashMap<BTreeSet<usize>, usize> = FxHashMap::default();
        let mut subsets = vec![start.clone()];
        let mut states = vec![source.subset_state(0, &start)];
        subset_index.insert(start, 0);

        let mut to_process = VecDeque::from([0]);
        while let Some(current) = to_process.pop_front() {
            for symbol in &source.alphabet {
                let next: BTreeSet<usize> = subsets[current]
                    .iter()
                    .flat_map(|&state| source.states[state].next_on(symbol))
                    .collect();
                if next.is_empty() {
                    continue;
                }
                let target = match subset_index.get(&next) {
                    Some(&target) => target,
                    None => {
                        let target = subsets.len();
                        states.push(source.subset_state(target, &next));
                        subsets.push(next.clone());
                        subset_index.insert(next, target);
                        to_process.push_back(target);
                        target
                    }
                };
                states[current].set_transition(target, symbol.clone());
            }
        }
        debug!(
            "determinized {} states into {} states",
            self.states.len(),
            states.len()
        );

        FiniteAutomaton::from_parts(
            0,
            states,
            source.alphabet.clone(),
            language::derived(&self.language),
        )
    }

    fn subset_state(&self, index: usize, subset: &BTreeSet<usize>) -> FAState {
        let identifier = subset
            .iter()
            .map(|&state| self.states[state].label())
            .collect::<Vec<_>>()
            .join(", ");
        FAState::with_identifier(
            index,
            &format!("{{{}}}", identifier),
            subset.iter().any(|&state| self.states[state].is_terminal),
        )
    }

    /// Whether the initial states of `a` and `b` fall into one block of the coarsest
    /// bisimulation over the disjoint union of both automata.
    ///
    /// Works directly on nondeterministic automata; bisimilar automata are always
    /// equivalent, the converse does not hold.
    pub fn bisimilar(a: &FiniteAutomaton, b: &FiniteAutomaton) -> bool {
        let offset = a.states.len();
        let mut states = a.states.clone();
        states.extend(b.states.iter().map(|state| {
            let mut shifted = FAState::with_identifier(
                state.index + offset,
                &state.identifier,
                state.is_terminal,
            );
            for (symbol, to) in state.edges() {
                shifted.set_transition(to + offset, symbol.clone());
            }
            shifted
        }));

        let blocks = bisimulation_blocks(&states);
        blocks[a.initial_state] == blocks[b.initial_state + offset]
    }

    /// Collapses every bisimulation block into a single state. The result is
    /// bisimilar to this automaton and keeps its nondeterminism.
    pub fn merge_bisimilar(&self) -> FiniteAutomaton {
        let blocks = bisimulation_blocks(&self.states);
        let mut members: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (state, &block) in blocks.iter().enumerate() {
            members.entry(block).or_default().push(state);
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
        for state in &self.states {
            for (symbol, to) in state.edges() {
                states[blocks[state.index]].set_transition(blocks[to], symbol.clone());
            }
        }
        debug!(
            "merged bisimilar states: {} -> {}",
            self.states.len(),
            states.len()
        );

        FiniteAutomaton::from_parts(
            blocks[self.initial_state],
            states,
            self.alphabet.clone(),
            language::derived(&self.language),
        )
    }
}
