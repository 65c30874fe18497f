pub mod comparison;
pub mod dfa;
pub mod epsilon_nfa;
pub mod finite_automaton;
pub mod memory_automaton;
pub mod nfa;
pub mod state;
pub mod transformation_monoid;

pub use finite_automaton::FiniteAutomaton;
pub use memory_automaton::{MFAState, MFATransition, MemoryFiniteAutomaton};
pub use state::FAState;
pub use transformation_monoid::{MonoidElement, TransformationMonoid};
