use std::collections::VecDeque;

use hashbrown::HashSet;
use log::debug;
use rustc_hash::FxHashMap;

use crate::fa::finite_automaton::FiniteAutomaton;

/// Reachable states in breadth-first order, following transitions in symbol order
fn breadth_first_order(automaton: &FiniteAutomaton) -> Vec<usize> {
    let mut order = vec![automaton.initial_state];
    let mut seen: HashSet<usize> = HashSet::from([automaton.initial_state]);
    let mut position = 0;
    while position < order.len() {
        let current = order[position];
        position += 1;
        for (_, next) in automaton.states[current].edges() {
            if seen.insert(next) {
                order.push(next);
            }
        }
    }
    order
}

/// Whether `q` of `b` can stand in for `p` of `a` given the pairs fixed so far
fn compatible(
    a: &FiniteAutomaton,
    b: &FiniteAutomaton,
    p: usize,
    q: usize,
    forward: &FxHashMap<usize, usize>,
) -> bool {
    let (left, right) = (&a.states[p], &b.states[q]);
    if left.is_terminal != right.is_terminal {
        return false;
    }
    let same_degrees = left.transitions.len() == right.transitions.len()
        && left
            .transitions
            .iter()
            .zip(right.transitions.iter())
            .all(|((s1, t1), (s2, t2))| s1 == s2 && t1.len() == t2.len());
    if !same_degrees {
        return false;
    }

    // Edges from p into already mapped states (p itself included)
    let outgoing = left.edges().all(|(symbol, to)| {
        let image = if to == p { Some(q) } else { forward.get(&to).copied() };
        image.map_or(true, |image| right.next_on(symbol).any(|next| next == image))
    });
    // Edges from mapped states into p
    let incoming = forward.iter().all(|(&from, &image)| {
        a.states[from]
            .edges()
            .filter(|&(_, to)| to == p)
            .all(|(symbol, _)| b.states[image].next_on(symbol).any(|next| next == q))
    });
    outgoing && incoming
}

/// Exact isomorphism of the reachable parts, found by backtracking over candidate
/// images in breadth-first order.
fn isomorphic(a: &FiniteAutomaton, b: &FiniteAutomaton) -> bool {
    let order_a = breadth_first_order(a);
    let order_b = breadth_first_order(b);
    if order_a.len() != order_b.len() {
        return false;
    }
    let count = order_a.len();

    let mut forward: FxHashMap<usize, usize> = FxHashMap::default();
    let mut used: HashSet<usize> = HashSet::new();
    // cursor[k]: next position of order_b to try as the image of order_a[k]
    let mut cursor = vec![0; count];
    let mut k = 0;
    loop {
        if k == count {
            return true;
        }
        let p = order_a[k];
        if let Some(previous) = forward.remove(&p) {
            used.remove(&previous);
        }

        let mut placed = false;
        while cursor[k] < count {
            let q = order_b[cursor[k]];
            cursor[k] += 1;
            if (k == 0 && q != b.initial_state) || used.contains(&q) {
                continue;
            }
            if compatible(a, b, p, q, &forward) {
                forward.insert(p, q);
                used.insert(q);
                placed = true;
                break;
            }
        }

        if placed {
            k += 1;
        } else {
            cursor[k] = 0;
            if k == 0 {
                return false;
            }
            k -= 1;
        }
    }
}

impl FiniteAutomaton {
    /// Structural equality up to state relabeling, sensitive to the alphabets.
    ///
    /// Deterministic inputs are minimized first, so two DFAs are equal exactly when
    /// they accept the same language over the same alphabet. Nondeterministic inputs
    /// are compared as graphs: their reachable parts must be isomorphic, with matching
    /// terminal flags and edge labels.
    pub fn equal(a: &FiniteAutomaton, b: &FiniteAutomaton) -> bool {
        if a.alphabet != b.alphabet {
            return false;
        }
        if a.is_deterministic() && b.is_deterministic() {
            let (a, b) = (a.minimize(), b.minimize());
            return a.initial_state == b.initial_state
                && a.states.len() == b.states.len()
                && a.states.iter().zip(b.states.iter()).all(|(left, right)| {
                    left.is_terminal == right.is_terminal && left.transitions == right.transitions
                });
        }
        isomorphic(a, b)
    }

    /// Language equality over the union of both alphabets. A symbol missing from one
    /// automaton's alphabet is rejected by that automaton.
    ///
    /// Both inputs are determinized and explored in lockstep; a side that has no
    /// transition is dead from then on.
    pub fn equivalent(a: &FiniteAutomaton, b: &FiniteAutomaton) -> bool {
        let (a, b) = (a.determinize(), b.determinize());
        let alphabet: Vec<_> = a.alphabet.union(&b.alphabet).cloned().collect();
        let accepting = |automaton: &FiniteAutomaton, state: Option<usize>| {
            state.map_or(false, |state| automaton.states[state].is_terminal)
        };

        let start = (Some(a.initial_state), Some(b.initial_state));
        let mut seen: HashSet<(Option<usize>, Option<usize>)> = HashSet::from([start]);
        let mut to_process = VecDeque::from([start]);
        while let Some((p, q)) = to_process.pop_front() {
            if accepting(&a, p) != accepting(&b, q) {
                debug!("automata differ after exploring {} state pairs", seen.len());
                return false;
            }
            for symbol in &alphabet {
                let next = (
                    p.and_then(|p| a.states[p].next_on(symbol).next()),
                    q.and_then(|q| b.states[q].next_on(symbol).next()),
                );
                if next != (None, None) && seen.insert(next) {
                    to_process.push_back(next);
                }
            }
        }
        debug!("automata agree on {} state pairs", seen.len());
        true
    }
}
