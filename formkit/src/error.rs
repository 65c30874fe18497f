use thiserror::Error;

/// Structural errors raised while assembling an automaton.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("state at position {position} carries index {index}; a state's index must equal its position")]
    StateIndexMismatch { position: usize, index: usize },

    #[error("transition from state {from} leads to state {to}, which does not exist")]
    DanglingTransition { from: usize, to: usize },

    #[error("initial state {initial} is out of range for an automaton with {states} states")]
    InvalidInitialState { initial: usize, states: usize },

    #[error("epsilon is not a member of any alphabet")]
    EpsilonInAlphabet,

    #[error("second initial state found: '{0}'")]
    SecondInitialState(String),

    #[error("memory transition from '{from}' to '{to}' in a plain finite automaton")]
    MemoryTransitionInFa { from: String, to: String },

    #[error("symbol names must not be empty")]
    EmptySymbolName,
}

/// Syntax errors reported by the regex parser. No partial tree accompanies them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegexError {
    #[error("unexpected '{found}' at position {position}")]
    UnexpectedChar { position: usize, found: char },

    #[error("unexpected end of input")]
    UnexpectedEnd,

    #[error("parenthesis opened at position {position} is never closed")]
    UnclosedParen { position: usize },

    #[error("missing operand at position {position}")]
    MissingOperand { position: usize },

    #[error("literal opened at position {position} is never closed")]
    UnclosedLiteral { position: usize },

    #[error("parentheses nested too deeply at position {position}")]
    NestingTooDeep { position: usize },
}

pub type FormResult<T> = Result<T, FormError>;
