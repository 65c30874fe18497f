use std::collections::BTreeSet;

use formkit::fa::{FAState, FiniteAutomaton};
use formkit::language::{is_alive, with_language, Language};
use formkit::regex::Regex;
use formkit::symbol::Symbol;

fn parse(text: &str) -> Regex {
    Regex::parse(text).unwrap()
}

#[test]
fn test_language_is_attached_lazily() {
    let nfa = parse("(a|b)*b").to_thompson();
    assert!(nfa.language_link().is_none());

    let id = nfa.language_id();
    assert!(nfa.language_link().is_some_and(|link| link.is_owner()));
    assert_eq!(nfa.language_id(), id);
    assert!(is_alive(id));
}

#[test]
fn test_derived_automata_share_the_language() {
    let nfa = parse("a*b").to_thompson();
    let id = nfa.language_id();

    let dfa = nfa.determinize();
    let minimal = dfa.minimize();
    let clone = nfa.clone();
    for automaton in [&dfa, &minimal, &clone] {
        assert_eq!(automaton.language_id(), id);
        assert!(!automaton.language_link().is_some_and(|link| link.is_owner()));
    }

    // A new language is not shared
    let complement = dfa.complement();
    assert_ne!(complement.language_id(), id);
}

#[test]
fn test_owner_releases_the_language() {
    let nfa = parse("ab*").to_thompson();
    let id = nfa.language_id();
    let dfa = nfa.determinize();

    drop(nfa);
    assert!(!is_alive(id));
    assert_eq!(with_language(id, |language| language.alphabet_size()), None);
    // The derived automaton still works, it only lost access to the cache
    assert_eq!(dfa.language_id(), id);
}

#[test]
fn test_regex_and_automaton_share_the_language() {
    let regex = parse("(ab)*");
    let id = regex.language_id();
    assert_eq!(regex.to_thompson().language_id(), id);
    assert_eq!(Regex::from_automaton(&regex.to_thompson()).language_id(), id);

    assert_eq!(regex.pump_length(), 2);
    assert_eq!(
        with_language(id, |language| language.is_pump_length_cached()),
        Some(true)
    );
}

#[test]
fn test_minimal_dfa_is_cached() {
    let nfa = parse("(a|b)*b(a|b)*").to_thompson();
    let id = nfa.language_id();
    assert_eq!(
        with_language(id, |language| language.is_min_dfa_cached()),
        Some(false)
    );

    let first = nfa.minimal_dfa();
    assert_eq!(
        with_language(id, |language| language.is_min_dfa_cached()),
        Some(true)
    );
    let second = nfa.minimal_dfa();
    assert_eq!(first.size(), 2);
    assert_eq!(first.to_txt(), second.to_txt());
    assert_eq!(second.language_id(), id);
}

#[test]
fn test_pump_length() {
    assert_eq!(parse("(a|b)*b").to_thompson().pump_length(), 2);
    assert_eq!(parse("abc").to_thompson().pump_length(), 4);
    assert_eq!(parse("a*").to_thompson().pump_length(), 1);
}

#[test]
fn test_syntactic_monoid() {
    let monoid = parse("(a|b)*b").to_thompson().syntactic_monoid();
    assert_eq!(monoid.len(), 3);
    assert!(monoid.identity().word.is_empty());

    let words: Vec<String> = monoid
        .elements()
        .iter()
        .map(|element| element.word.iter().map(|s| s.to_string()).collect())
        .collect();
    assert_eq!(words, vec!["", "a", "b"]);

    let word = vec![Symbol::from('a'), Symbol::from('b'), Symbol::from('b')];
    assert_eq!(monoid.element_of(&word).map(|e| e.word.len()), Some(1));
    assert!(monoid.element_of(&[Symbol::from('c')]).is_none());
}

#[test]
fn test_syntactic_monoid_of_simple_languages() {
    assert_eq!(parse("a*").to_thompson().syntactic_monoid().len(), 1);
    assert_eq!(parse("∅").to_thompson().syntactic_monoid().len(), 1);
    // The empty word, a, and every longer word
    assert_eq!(parse("a").to_thompson().syntactic_monoid().len(), 3);
}

#[test]
fn test_cache_setters_store_once() {
    let automaton = FiniteAutomaton::new(
        0,
        vec![FAState::new(0, true)],
        BTreeSet::from([Symbol::from('a')]),
    );
    let id = automaton.language_id();

    let stored = with_language(id, |language| {
        assert!(!language.is_nfa_minimum_size_cached());
        language.set_nfa_minimum_size(3);
        language.set_nfa_minimum_size(5);
        language.set_one_unambiguous_flag(true);
        language.set_one_unambiguous_regex("ε".to_string());
        (
            language.get_nfa_minimum_size(),
            language.get_one_unambiguous_flag(),
            language.get_one_unambiguous_regex().to_string(),
            language.alphabet_size(),
        )
    });
    assert_eq!(stored, Some((3, true, "ε".to_string(), 1)));
}

#[test]
#[should_panic(expected = "requested before it was cached")]
fn test_getter_before_setter_panics() {
    let language = Language::new(BTreeSet::new());
    language.get_pump_length();
}
