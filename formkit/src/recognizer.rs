use crate::symbol::{symbols_of, Symbol};

/// Something that decides membership of words
pub trait Recognizer {
    /// Checks if the word is accepted
    fn accepts(&self, input: &[Symbol]) -> bool;

    /// Checks if the text is accepted, reading one literal symbol per character
    fn accepts_string(&self, input: &str) -> bool {
        self.accepts(&symbols_of(input))
    }
}
