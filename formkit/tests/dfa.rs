use std::collections::BTreeSet;

use formkit::fa::{FAState, FiniteAutomaton};
use formkit::kind::ObjectKind;
use formkit::recognizer::Recognizer;
use formkit::regex::{regex_to_dfa, Regex};
use formkit::symbol::Symbol;

fn automaton(
    initial: usize,
    terminal: &[usize],
    edges: &[(usize, char, usize)],
) -> FiniteAutomaton {
    let count = edges
        .iter()
        .flat_map(|&(from, _, to)| [from, to])
        .chain(terminal.iter().copied())
        .chain([initial])
        .max()
        .map_or(1, |max| max + 1);
    let mut states: Vec<FAState> = (0..count)
        .map(|i| FAState::new(i, terminal.contains(&i)))
        .collect();
    for &(from, symbol, to) in edges {
        states[from].set_transition(to, Symbol::from(symbol));
    }
    FiniteAutomaton::new(initial, states, BTreeSet::new())
}

#[test]
fn test_complement() {
    let dfa = regex_to_dfa("a*b*a").unwrap();
    let complement_dfa = dfa.complement();

    // Test the complement DFA
    assert!(complement_dfa.accepts_string("ab"));
    assert!(!complement_dfa.accepts_string("ba"));
    assert!(!complement_dfa.accepts_string("aaabbbba"));
    assert!(!complement_dfa.accepts_string("a"));
    assert!(!complement_dfa.accepts_string("aaaaaaaaaa"));
    assert!(complement_dfa.accepts_string(""));
    assert!(complement_dfa.accepts_string("aabaaab"));
}

#[test]
fn test_complement_is_complete() {
    let dfa = regex_to_dfa("ab").unwrap();
    assert!(!dfa.is_complete());

    let complement_dfa = dfa.complement();
    assert!(complement_dfa.is_complete());
    assert!(complement_dfa.is_deterministic());
    assert_eq!(complement_dfa.size(), dfa.size() + 1);
    assert!(complement_dfa.accepts_string("b"));
    assert!(complement_dfa.accepts_string("abab"));
    assert!(!complement_dfa.accepts_string("ab"));
}

#[test]
fn test_intersection() {
    let dfa1 = regex_to_dfa("a*b*").unwrap();
    let dfa2 = regex_to_dfa("b*a*b").unwrap();

    let intersection_dfa = FiniteAutomaton::intersection(&dfa1, &dfa2);

    // Test the intersection DFA
    assert!(intersection_dfa.accepts_string("ab"));
    assert!(intersection_dfa.accepts_string("aaab"));
    assert!(intersection_dfa.accepts_string("bb"));

    assert!(!intersection_dfa.accepts_string("aaabbbb"));
    assert!(!intersection_dfa.accepts_string("ba"));
    assert!(!intersection_dfa.accepts_string("aaabbbba"));
    assert!(!intersection_dfa.accepts_string("a"));
    assert!(!intersection_dfa.accepts_string("aaaaaaaaaa"));
    assert!(!intersection_dfa.accepts_string(""));
}

#[test]
fn test_intersection_of_nfas() {
    // Words ending with b, and words of even length
    let ends_with_b = automaton(0, &[1], &[(0, 'a', 0), (0, 'b', 0), (0, 'b', 1)]);
    let even = automaton(0, &[0], &[(0, 'a', 1), (0, 'b', 1), (1, 'a', 0), (1, 'b', 0)]);

    let product = FiniteAutomaton::intersection(&ends_with_b, &even);
    assert!(product.accepts_string("ab"));
    assert!(product.accepts_string("bbab"));
    assert!(!product.accepts_string("b"));
    assert!(!product.accepts_string("ba"));
    assert!(!product.accepts_string(""));
}

#[test]
fn test_determinize_example() {
    // 0 loops on a and moves to 1 on b, 1 loops on a and b
    let nfa = automaton(0, &[1], &[(0, 'a', 0), (0, 'b', 1), (1, 'a', 1), (1, 'b', 1)]);
    let dfa = nfa.determinize();

    assert!(dfa.is_deterministic());
    let regex = Regex::parse("(a|b)*b(a|b)*").unwrap();
    assert!(FiniteAutomaton::equivalent(&dfa, &regex.to_thompson()));
}

#[test]
fn test_determinize_nondeterministic() {
    let nfa = automaton(0, &[1], &[(0, 'a', 0), (0, 'b', 0), (0, 'b', 1)]);
    assert!(!nfa.is_deterministic());

    let dfa = nfa.determinize();
    assert!(dfa.is_deterministic());
    assert_eq!(dfa.size(), 2);
    assert!(dfa.accepts_string("aab"));
    assert!(!dfa.accepts_string("aba"));
    assert!(FiniteAutomaton::equivalent(&nfa, &dfa));
}

#[test]
fn test_minimize() {
    let dfa = Regex::parse("(a|b)*b(a|b)*")
        .unwrap()
        .to_thompson()
        .determinize();
    let minimal = dfa.minimize();

    assert_eq!(minimal.size(), 2);
    assert_eq!(minimal.initial_state(), 0);
    assert!(!minimal.state(0).is_terminal);
    assert!(minimal.state(1).is_terminal);
    assert!(FiniteAutomaton::equivalent(&dfa, &minimal));
}

#[test]
fn test_minimize_removes_dead_states() {
    // State 2 cannot reach the terminal state, state 3 is unreachable
    let dfa = automaton(0, &[1], &[(0, 'a', 1), (0, 'b', 2), (2, 'a', 2), (3, 'a', 1)]);
    let minimal = dfa.minimize();
    assert_eq!(minimal.size(), 2);
    assert!(minimal.accepts_string("a"));
    assert!(!minimal.accepts_string("b"));
}

#[test]
fn test_minimize_empty_language() {
    let dfa = automaton(0, &[], &[(0, 'a', 1), (1, 'b', 0)]);
    let minimal = dfa.minimize();
    assert_eq!(minimal.size(), 1);
    assert!(minimal.is_empty());
    assert!(minimal.terminal_states().is_empty());
}

#[test]
fn test_minimize_idempotent() {
    let dfa = regex_to_dfa("(ab|ba)*a").unwrap();
    let again = dfa.minimize();
    assert_eq!(dfa.size(), again.size());
    assert!(FiniteAutomaton::equal(&dfa, &again));
    assert_eq!(dfa.to_txt(), again.to_txt());
}

#[test]
fn test_equal_relabeling() {
    let dfa1 = automaton(0, &[1], &[(0, 'a', 1), (1, 'b', 0)]);
    let dfa2 = automaton(1, &[0], &[(1, 'a', 0), (0, 'b', 1)]);
    let dfa3 = automaton(0, &[1], &[(0, 'a', 1), (1, 'a', 0), (1, 'b', 0)]);

    assert!(FiniteAutomaton::equal(&dfa1, &dfa1));
    assert!(FiniteAutomaton::equal(&dfa1, &dfa2));
    assert!(!FiniteAutomaton::equal(&dfa1, &dfa3));
}

#[test]
fn test_equal_is_alphabet_sensitive() {
    let dfa = automaton(0, &[0], &[(0, 'a', 0)]);
    let states = dfa.states().to_vec();
    let wider = FiniteAutomaton::new(0, states, BTreeSet::from([Symbol::from('b')]));

    assert!(!FiniteAutomaton::equal(&dfa, &wider));
    assert!(FiniteAutomaton::equivalent(&dfa, &wider));
}

#[test]
fn test_equal_nfa() {
    let nfa1 = automaton(0, &[], &[(0, 'a', 1), (0, 'a', 2), (1, 'b', 3), (2, 'c', 3)]);
    let nfa2 = automaton(3, &[], &[(3, 'a', 2), (3, 'a', 1), (2, 'b', 0), (1, 'c', 0)]);
    let nfa3 = automaton(0, &[], &[(0, 'a', 1), (0, 'a', 2), (1, 'b', 3), (2, 'c', 2)]);

    assert!(FiniteAutomaton::equal(&nfa1, &nfa1));
    assert!(FiniteAutomaton::equal(&nfa1, &nfa2));
    assert!(!FiniteAutomaton::equal(&nfa1, &nfa3));
}

#[test]
fn test_equivalent() {
    let a_star = regex_to_dfa("a*").unwrap();
    let a_or_b_star = regex_to_dfa("(a|b)*").unwrap();
    let nested = Regex::parse("(a*b*)*").unwrap().to_thompson();

    assert!(!FiniteAutomaton::equivalent(&a_star, &a_or_b_star));
    assert!(FiniteAutomaton::equivalent(&a_or_b_star, &nested));
    assert!(FiniteAutomaton::equivalent(&nested, &a_or_b_star));
}

#[test]
fn test_canonical_relabel() {
    let dfa = automaton(2, &[0], &[(2, 'a', 1), (1, 'b', 0)]);
    let canonical = dfa.canonical_relabel();
    assert_eq!(canonical.initial_state(), 0);
    assert_eq!(canonical.state(0).identifier, "2");
    assert_eq!(canonical.state(1).identifier, "1");
    assert!(canonical.state(2).is_terminal);
}

#[test]
fn test_kind() {
    let dfa = regex_to_dfa("ab*").unwrap();
    let nfa = Regex::parse("ab*").unwrap().to_thompson();

    assert_eq!(dfa.kind(), ObjectKind::Dfa);
    assert_eq!(nfa.kind(), ObjectKind::Nfa);
    assert!(ObjectKind::Dfa.is_subtype_of(ObjectKind::Nfa));
    assert!(!ObjectKind::Nfa.is_subtype_of(ObjectKind::Dfa));
    assert_eq!(ObjectKind::Nfa.children(), vec![ObjectKind::Dfa]);
    assert_eq!(ObjectKind::Dfa.to_string(), "DFA");
}
