use std::collections::VecDeque;

use log::debug;
use rustc_hash::FxHashMap;

use crate::fa::finite_automaton::FiniteAutomaton;
use crate::symbol::Symbol;

/// One transformation of the state set together with its shortest
/// (length-lexicographically least) representative word.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MonoidElement {
    pub word: Vec<Symbol>,
    pub transformation: Vec<usize>, // state -> state after reading `word`
}

/// The monoid of state transformations induced by the words over an alphabet.
/// Computed on the minimal complete DFA it is the syntactic monoid of the language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformationMonoid {
    alphabet: Vec<Symbol>,
    delta: Vec<Vec<usize>>,       // state -> position in alphabet -> state
    elements: Vec<MonoidElement>, // identity first, then by representative word
}

impl TransformationMonoid {
    /// Enumerates the transformations of a deterministic automaton, completed with a
    /// sink, breadth-first over words in length-lexicographic order.
    ///
    /// An automaton without terminal states is treated as its single-state quotient.
    pub fn of(dfa: &FiniteAutomaton) -> Self {
        debug_assert!(dfa.is_deterministic());
        let alphabet: Vec<Symbol> = dfa.alphabet().iter().cloned().collect();
        let delta: Vec<Vec<usize>> = if dfa.terminal_states().is_empty() {
            vec![vec![0; alphabet.len()]]
        } else {
            let complete = dfa.complete();
            complete
                .states()
                .iter()
                .map(|state| {
                    alphabet
                        .iter()
                        .map(|symbol| state.next_on(symbol).next().unwrap_or(state.index))
                        .collect()
                })
                .collect()
        };

        let identity = MonoidElement {
            word: Vec::new(),
            transformation: (0..delta.len()).collect(),
        };
        let mut known: FxHashMap<Vec<usize>, usize> = FxHashMap::default();
        known.insert(identity.transformation.clone(), 0);
        let mut elements = vec![identity];
        let mut to_process = VecDeque::from([0]);
        while let Some(current) = to_process.pop_front() {
            for (position, symbol) in alphabet.iter().enumerate() {
                let transformation: Vec<usize> = elements[current]
                    .transformation
                    .iter()
                    .map(|&state| delta[state][position])
                    .collect();
                if known.contains_key(&transformation) {
                    continue;
                }
                let mut word = elements[current].word.clone();
                word.push(symbol.clone());
                known.insert(transformation.clone(), elements.len());
                to_process.push_back(elements.len());
                elements.push(MonoidElement {
                    word,
                    transformation,
                });
            }
        }
        debug!(
            "transformation monoid over {} states: {} elements",
            delta.len(),
            elements.len()
        );

        TransformationMonoid {
            alphabet,
            delta,
            elements,
        }
    }

    pub fn alphabet(&self) -> &[Symbol] {
        &self.alphabet
    }

    pub fn elements(&self) -> &[MonoidElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Always false: the identity is a member of every monoid
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn identity(&self) -> &MonoidElement {
        &self.elements[0]
    }

    /// The element a word evaluates to, `None` if the word leaves the alphabet
    pub fn element_of(&self, word: &[Symbol]) -> Option<&MonoidElement> {
        let mut transformation = self.identity().transformation.clone();
        for symbol in word {
            let position = self.alphabet.iter().position(|s| s == symbol)?;
            for state in transformation.iter_mut() {
                *state = self.delta[*state][position];
            }
        }
        self.elements
            .iter()
            .find(|element| element.transformation == transformation)
    }
}
