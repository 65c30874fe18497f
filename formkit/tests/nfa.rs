use std::collections::BTreeSet;

use formkit::error::FormError;
use formkit::fa::{FAState, FiniteAutomaton};
use formkit::recognizer::Recognizer;
use formkit::symbol::{symbols_of, Symbol};

fn state(index: usize, is_terminal: bool, edges: &[(Symbol, usize)]) -> FAState {
    let mut state = FAState::new(index, is_terminal);
    for (symbol, to) in edges {
        state.set_transition(*to, symbol.clone());
    }
    state
}

fn a() -> Symbol {
    Symbol::from('a')
}

fn b() -> Symbol {
    Symbol::from('b')
}

fn eps() -> Symbol {
    Symbol::Epsilon
}

/// Three states with epsilon moves; the initial state is 1
fn three_state_nfa() -> FiniteAutomaton {
    FiniteAutomaton::new(
        1,
        vec![
            state(0, true, &[(a(), 1), (eps(), 1), (b(), 2)]),
            state(1, false, &[(a(), 2), (b(), 1)]),
            state(2, true, &[(a(), 1), (eps(), 1), (b(), 0)]),
        ],
        BTreeSet::from([a(), b()]),
    )
}

fn two_state_nfa() -> FiniteAutomaton {
    FiniteAutomaton::new(
        1,
        vec![
            state(0, true, &[(a(), 1), (eps(), 1), (b(), 0)]),
            state(1, false, &[(a(), 0), (b(), 1)]),
        ],
        BTreeSet::from([a(), b()]),
    )
}

#[test]
fn test_construction_errors() {
    let misplaced = FiniteAutomaton::try_new(0, vec![state(1, false, &[])], BTreeSet::new());
    assert_eq!(
        misplaced.unwrap_err(),
        FormError::StateIndexMismatch {
            position: 0,
            index: 1
        }
    );

    let dangling = FiniteAutomaton::try_new(0, vec![state(0, false, &[(a(), 3)])], BTreeSet::new());
    assert_eq!(
        dangling.unwrap_err(),
        FormError::DanglingTransition { from: 0, to: 3 }
    );

    let bad_initial = FiniteAutomaton::try_new(2, vec![state(0, false, &[])], BTreeSet::new());
    assert_eq!(
        bad_initial.unwrap_err(),
        FormError::InvalidInitialState {
            initial: 2,
            states: 1
        }
    );

    let epsilon_alphabet =
        FiniteAutomaton::try_new(0, vec![state(0, false, &[])], BTreeSet::from([eps()]));
    assert_eq!(epsilon_alphabet.unwrap_err(), FormError::EpsilonInAlphabet);

    let reference = FiniteAutomaton::try_new(
        0,
        vec![state(0, false, &[(Symbol::reference(1), 0)])],
        BTreeSet::new(),
    );
    assert!(matches!(
        reference.unwrap_err(),
        FormError::MemoryTransitionInFa { .. }
    ));
}

#[test]
#[should_panic(expected = "invalid finite automaton")]
fn test_new_panics_on_misplaced_state() {
    FiniteAutomaton::new(0, vec![state(1, false, &[])], BTreeSet::new());
}

#[test]
fn test_alphabet_from_transitions() {
    let nfa = FiniteAutomaton::new(
        0,
        vec![state(0, true, &[(a(), 0), (eps(), 0)])],
        BTreeSet::new(),
    );
    assert_eq!(nfa.alphabet(), &BTreeSet::from([a()]));
}

#[test]
fn test_empty_symbol_names() {
    let unnamed_edge = state(0, true, &[(Symbol::new(""), 0)]);
    assert_eq!(
        FiniteAutomaton::try_new(0, vec![unnamed_edge], BTreeSet::new()).unwrap_err(),
        FormError::EmptySymbolName
    );
    assert_eq!(
        FiniteAutomaton::try_new(
            0,
            vec![state(0, true, &[])],
            BTreeSet::from([Symbol::new("")])
        )
        .unwrap_err(),
        FormError::EmptySymbolName
    );
}

#[test]
fn test_epsilon_closure() {
    let nfa = FiniteAutomaton::new(
        0,
        vec![
            state(0, false, &[(eps(), 1)]),
            state(1, false, &[(eps(), 2), (a(), 0)]),
            state(2, true, &[]),
        ],
        BTreeSet::new(),
    );
    assert_eq!(nfa.epsilon_closure(0), BTreeSet::from([0, 1, 2]));
    assert_eq!(nfa.epsilon_closure(1), BTreeSet::from([1, 2]));
    assert_eq!(nfa.epsilon_closure(2), BTreeSet::from([2]));
}

#[test]
fn test_remove_eps() {
    let nfa = three_state_nfa();
    assert!(nfa.has_epsilon_transitions());

    let without = nfa.remove_eps();
    assert!(!without.has_epsilon_transitions());
    assert_eq!(without.size(), nfa.size());
    // State 0 inherits the edges of state 1 and stays terminal
    assert!(without.state(0).transitions[&a()].contains(&2));
    assert!(without.state(0).is_terminal);
    assert!(FiniteAutomaton::equivalent(&nfa, &without));
}

#[test]
fn test_parsing_by_nfa() {
    let nfa = three_state_nfa();
    // From 1: a leads to 2 (terminal), b stays in 1
    assert!(nfa.parsing_by_nfa("a"));
    assert!(nfa.parsing_by_nfa("bba"));
    assert!(!nfa.parsing_by_nfa(""));
    assert!(!nfa.parsing_by_nfa("b"));
    assert!(!nfa.parsing_by_nfa("ac"));
    assert_eq!(nfa.parsing_by_nfa("ab"), nfa.accepts(&symbols_of("ab")));
}

#[test]
fn test_bisimilar() {
    let nfa1 = three_state_nfa();
    let nfa2 = two_state_nfa();
    assert!(FiniteAutomaton::bisimilar(&nfa1, &nfa2));
    assert!(FiniteAutomaton::equivalent(&nfa1, &nfa2));

    let other = FiniteAutomaton::new(
        0,
        vec![state(0, false, &[(a(), 1)]), state(1, true, &[])],
        BTreeSet::new(),
    );
    assert!(!FiniteAutomaton::bisimilar(&nfa1, &other));
}

#[test]
fn test_equivalent_but_not_bisimilar() {
    // a(b|c) against ab|ac
    let c = Symbol::from('c');
    let shared = FiniteAutomaton::new(
        0,
        vec![
            state(0, false, &[(a(), 1)]),
            state(1, false, &[(b(), 2), (c.clone(), 2)]),
            state(2, true, &[]),
        ],
        BTreeSet::new(),
    );
    let split = FiniteAutomaton::new(
        0,
        vec![
            state(0, false, &[(a(), 1), (a(), 2)]),
            state(1, false, &[(b(), 3)]),
            state(2, false, &[(c, 3)]),
            state(3, true, &[]),
        ],
        BTreeSet::new(),
    );
    assert!(FiniteAutomaton::equivalent(&shared, &split));
    assert!(!FiniteAutomaton::bisimilar(&shared, &split));
}

#[test]
fn test_merge_bisimilar() {
    let nfa = three_state_nfa();
    let merged = nfa.merge_bisimilar();

    assert_eq!(merged.size(), 2);
    assert!(merged.size() <= nfa.size());
    assert!(FiniteAutomaton::bisimilar(&nfa, &merged));
    assert!(FiniteAutomaton::equivalent(&nfa, &merged));
    assert_eq!(merged.state(merged.initial_state()).identifier, "1");
}

#[test]
fn test_reachability() {
    let nfa = FiniteAutomaton::new(
        0,
        vec![
            state(0, false, &[(a(), 1)]),
            state(1, true, &[]),
            state(2, false, &[(b(), 1)]),
            state(3, false, &[(a(), 3)]),
        ],
        BTreeSet::new(),
    );
    assert_eq!(nfa.reachable_states(0).len(), 2);
    assert!(nfa.leading_to_terminal_states().contains(&2));
    assert!(!nfa.leading_to_terminal_states().contains(&3));
    assert!(!nfa.is_empty());
    assert_eq!(nfa.shortest_word(), Some(vec![a()]));
}

#[test]
fn test_shortest_word() {
    let nfa = FiniteAutomaton::new(
        0,
        vec![
            state(0, false, &[(a(), 0), (b(), 1), (eps(), 2)]),
            state(1, false, &[(b(), 3)]),
            state(2, false, &[(a(), 3)]),
            state(3, true, &[]),
        ],
        BTreeSet::new(),
    );
    assert_eq!(nfa.shortest_word(), Some(vec![a()]));

    let empty = FiniteAutomaton::new(0, vec![state(0, false, &[(a(), 0)])], BTreeSet::new());
    assert!(empty.is_empty());
    assert_eq!(empty.shortest_word(), None);
}

#[test]
fn test_to_txt() {
    let nfa = FiniteAutomaton::new(
        0,
        vec![state(0, false, &[(b(), 1), (a(), 1), (eps(), 0)]), state(1, true, &[])],
        BTreeSet::new(),
    );
    let expected = "digraph {\n\
                    \trankdir = LR\n\
                    \tdummy [label = \"\", shape = none]\n\
                    \t0 [label = \"0\", shape = circle]\n\
                    \t1 [label = \"1\", shape = doublecircle]\n\
                    \tdummy -> 0\n\
                    \t0 -> 0 [label = \"eps\"]\n\
                    \t0 -> 1 [label = \"a\"]\n\
                    \t0 -> 1 [label = \"b\"]\n\
                    }\n";
    assert_eq!(nfa.to_txt(), expected);
}

#[test]
fn test_to_txt_quotes_labels() {
    let mut quoted = FAState::with_identifier(0, "say \"hi\"", true);
    quoted.set_transition(0, Symbol::new("a\\b"));
    let nfa = FiniteAutomaton::new(0, vec![quoted], BTreeSet::new());
    let txt = nfa.to_txt();
    assert!(txt.contains("\t0 [label = \"say \\\"hi\\\"\", shape = doublecircle]\n"));
    assert!(txt.contains("\t0 -> 0 [label = \"a\\\\b\"]\n"));
}
