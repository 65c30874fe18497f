use proptest::prelude::*;

use formkit::fa::FiniteAutomaton;
use formkit::recognizer::Recognizer;
use formkit::regex::{arden_system_of, arden_to_regex, Regex, RegexNode};

fn regex_tree() -> impl Strategy<Value = RegexNode> {
    let leaf = prop_oneof![
        Just(RegexNode::literal("a")),
        Just(RegexNode::literal("b")),
        Just(RegexNode::Epsilon),
    ];
    leaf.prop_recursive(3, 16, 3, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 2..=3).prop_map(RegexNode::concat),
            prop::collection::vec(inner.clone(), 2..=3).prop_map(RegexNode::union),
            inner.prop_map(RegexNode::star),
        ]
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn printed_regex_parses_back(node in regex_tree()) {
        let regex = Regex::from_node(node);
        let text = regex.to_string();
        let reparsed = Regex::parse(&text);
        prop_assert!(reparsed.is_ok(), "{} does not parse", text);
        if let Ok(reparsed) = reparsed {
            prop_assert!(Regex::equivalent(&regex, &reparsed), "{} changed meaning", text);
        }
    }

    #[test]
    fn remove_eps_keeps_the_language(node in regex_tree()) {
        let nfa = Regex::from_node(node).to_thompson();
        let without = nfa.remove_eps();
        prop_assert!(!without.has_epsilon_transitions());
        prop_assert_eq!(without.size(), nfa.size());
        prop_assert!(FiniteAutomaton::equivalent(&nfa, &without));
    }

    #[test]
    fn determinize_and_minimize(node in regex_tree()) {
        let nfa = Regex::from_node(node).to_thompson();
        let dfa = nfa.determinize();
        prop_assert!(dfa.is_deterministic());
        prop_assert!(FiniteAutomaton::equivalent(&nfa, &dfa));
        prop_assert!(FiniteAutomaton::equal(&dfa, &dfa));

        let minimal = dfa.minimize();
        prop_assert!(minimal.size() <= dfa.size());
        prop_assert!(FiniteAutomaton::equivalent(&dfa, &minimal));
        prop_assert!(FiniteAutomaton::equal(&minimal, &minimal.minimize()));
    }

    #[test]
    fn merge_bisimilar_keeps_the_language(node in regex_tree()) {
        let nfa = Regex::from_node(node).to_thompson();
        let merged = nfa.merge_bisimilar();
        prop_assert!(merged.size() <= nfa.size());
        prop_assert!(FiniteAutomaton::bisimilar(&nfa, &merged));
        prop_assert!(FiniteAutomaton::equivalent(&nfa, &merged));
    }

    #[test]
    fn arden_solution_is_equivalent(node in regex_tree()) {
        let regex = Regex::from_node(node);
        let solved = Regex::from_node(arden_to_regex(&arden_system_of(&regex.to_thompson())));
        prop_assert!(Regex::equivalent(&regex, &solved), "{} was solved into {}", regex, solved);
    }

    #[test]
    fn nth_word_is_accepted(node in regex_tree(), n in 0usize..3) {
        let regex = Regex::from_node(node);
        let word = regex.nth_word(n);
        prop_assert!(regex.accepts(&word));
        prop_assert!(regex.to_thompson().accepts(&word));
    }
}
