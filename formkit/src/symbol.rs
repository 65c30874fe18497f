use std::fmt::{Display, Formatter};

/// Textual tokens that denote the empty word in structural input.
pub const EPSILON_TOKENS: [&str; 4] = ["eps", "epsilon", "ε", "ϵ"];
pub const EPSILON: &str = EPSILON_TOKENS[0];

/// Prefix marking a memory-cell back-reference token, e.g. `&1`.
pub const REF_PREFIX: char = '&';

/// An input token read by an automaton.
///
/// The derived order (epsilon, then literals by name, then references by cell id)
/// is the canonical order used for serialization and for iterating transition tables.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Symbol {
    Epsilon,
    Literal(String),
    Ref(usize),
}

impl Symbol {
    /// Create a literal symbol
    pub fn new(name: &str) -> Self {
        Symbol::Literal(name.to_string())
    }

    pub fn from_char(c: char) -> Self {
        Symbol::Literal(c.to_string())
    }

    /// Create a reference to the value captured by memory cell `cell`
    pub fn reference(cell: usize) -> Self {
        Symbol::Ref(cell)
    }

    /// Reads a token as written in structural input: `eps` (or an alias) is epsilon,
    /// `&<n>` is a memory reference, anything else is a literal.
    pub fn from_token(token: &str) -> Self {
        if EPSILON_TOKENS.contains(&token) {
            return Symbol::Epsilon;
        }
        if let Some(cell) = token.strip_prefix(REF_PREFIX) {
            if let Ok(cell) = cell.parse::<usize>() {
                return Symbol::Ref(cell);
            }
        }
        Symbol::new(token)
    }

    pub fn is_epsilon(&self) -> bool {
        matches!(self, Symbol::Epsilon)
    }

    pub fn is_ref(&self) -> bool {
        matches!(self, Symbol::Ref(_))
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Symbol::Literal(_))
    }

    /// Name of a literal, `None` for epsilon and references
    pub fn name(&self) -> Option<&str> {
        match self {
            Symbol::Literal(name) => Some(name),
            Symbol::Epsilon | Symbol::Ref(_) => None,
        }
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Symbol::Epsilon => write!(f, "{}", EPSILON),
            Symbol::Literal(name) => write!(f, "{}", name),
            Symbol::Ref(cell) => write!(f, "{}{}", REF_PREFIX, cell),
        }
    }
}

impl From<char> for Symbol {
    fn from(c: char) -> Self {
        Symbol::from_char(c)
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Symbol::new(name)
    }
}

/// Splits a string into one literal symbol per character
pub fn symbols_of(word: &str) -> Vec<Symbol> {
    word.chars().map(Symbol::from_char).collect()
}

/// Joins the names of a word back into a string; epsilon contributes nothing
pub fn word_to_string(word: &[Symbol]) -> String {
    word.iter()
        .filter(|symbol| !symbol.is_epsilon())
        .map(|symbol| symbol.to_string())
        .collect()
}
