pub mod arden;
pub mod node;
pub mod parser;
pub mod regex;
pub mod thompson;
pub mod words;

pub use arden::{arden_system_of, arden_to_regex, ArdenSystem, Equation};
pub use node::RegexNode;
pub use regex::{regex_to_dfa, Regex};
