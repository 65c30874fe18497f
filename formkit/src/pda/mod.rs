pub mod pushdown_automaton;
pub mod state;

pub use pushdown_automaton::{ParseLimits, ParseOutcome, PushdownAutomaton};
pub use state::{PDAState, PDATransition};
