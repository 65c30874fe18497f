pub mod description;
pub mod error;
pub mod fa;
pub mod kind;
pub mod language;
pub mod pda;
pub mod recognizer;
pub mod regex;
pub mod symbol;

pub use error::{FormError, FormResult, RegexError};
pub use fa::FiniteAutomaton;
pub use pda::PushdownAutomaton;
pub use recognizer::Recognizer;
pub use regex::Regex;
pub use symbol::Symbol;
