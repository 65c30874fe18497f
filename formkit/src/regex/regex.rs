use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use once_cell::sync::OnceCell;

use crate::error::RegexError;
use crate::fa::finite_automaton::FiniteAutomaton;
use crate::fa::transformation_monoid::TransformationMonoid;
use crate::kind::ObjectKind;
use crate::language::{self, LanguageId, LanguageLink};
use crate::recognizer::Recognizer;
use crate::regex::arden::{arden_system_of, arden_to_regex};
use crate::regex::node::RegexNode;
use crate::regex::parser;
use crate::regex::thompson::thompson_states;
use crate::regex::words::nth_word;
use crate::symbol::{word_to_string, Symbol};

/// A regular expression together with its alphabet and language link
#[derive(Debug, Clone)]
pub struct Regex {
    root: RegexNode,
    alphabet: BTreeSet<Symbol>,
    language: OnceCell<LanguageLink>,
}

impl Regex {
    pub fn from_node(root: RegexNode) -> Self {
        let alphabet = root.alphabet();
        Regex {
            root,
            alphabet,
            language: OnceCell::new(),
        }
    }

    /// Parses regex text; malformed text yields an error and no partial tree
    pub fn parse(text: &str) -> Result<Self, RegexError> {
        parser::parse(text).map(Regex::from_node)
    }

    /// Reconstructs a regex for the language of an automaton by solving its
    /// equation system. The result shares the automaton's language.
    pub fn from_automaton(automaton: &FiniteAutomaton) -> Self {
        let root = arden_to_regex(&arden_system_of(automaton));
        Regex {
            root,
            alphabet: automaton.alphabet().clone(),
            language: language::derived(&automaton.language),
        }
    }

    pub fn root(&self) -> &RegexNode {
        &self.root
    }

    pub fn alphabet(&self) -> &BTreeSet<Symbol> {
        &self.alphabet
    }

    pub fn kind(&self) -> ObjectKind {
        ObjectKind::Regex
    }

    /// Canonical text of the regex
    pub fn to_txt(&self) -> String {
        self.root.to_string()
    }

    /// Compiles the regex into an epsilon-NFA sharing this regex's language
    pub fn to_thompson(&self) -> FiniteAutomaton {
        let (initial_state, states) = thompson_states(&self.root);
        FiniteAutomaton::from_parts(
            initial_state,
            states,
            self.alphabet.clone(),
            language::derived(&self.language),
        )
    }

    /// Language equality, over the union of both alphabets
    pub fn equivalent(a: &Regex, b: &Regex) -> bool {
        FiniteAutomaton::equivalent(&a.to_thompson(), &b.to_thompson())
    }

    /// Deterministic member of a growing word family (see [`nth_word`])
    pub fn nth_word(&self, n: usize) -> Vec<Symbol> {
        nth_word(&self.root, n)
    }

    pub fn nth_word_string(&self, n: usize) -> String {
        word_to_string(&self.nth_word(n))
    }

    pub fn language_id(&self) -> LanguageId {
        language::attach(&self.language, || self.alphabet.clone())
    }

    pub fn language_link(&self) -> Option<&LanguageLink> {
        self.language.get()
    }

    pub fn minimal_dfa(&self) -> FiniteAutomaton {
        self.language_id();
        self.to_thompson().minimal_dfa()
    }

    pub fn syntactic_monoid(&self) -> TransformationMonoid {
        self.language_id();
        self.to_thompson().syntactic_monoid()
    }

    pub fn pump_length(&self) -> usize {
        self.language_id();
        self.to_thompson().pump_length()
    }
}

impl FromStr for Regex {
    type Err = RegexError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Regex::parse(text)
    }
}

impl Display for Regex {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)
    }
}

impl Recognizer for Regex {
    fn accepts(&self, input: &[Symbol]) -> bool {
        self.to_thompson().accepts(input)
    }
}

/// Minimal DFA of the language of regex text
pub fn regex_to_dfa(text: &str) -> Result<FiniteAutomaton, RegexError> {
    Ok(Regex::parse(text)?.to_thompson().determinize().minimize())
}
