/*
Grammar, whitespace between tokens ignored:

Alt  : Cat
     : Cat '|' Alt
Cat  : Star
     : Star Cat
Star : Atom
     : Star '*'
Atom : '(' Alt ')' | literal | '\' char | '<' name '>' | 'ε' | '∅'

Inside a name, '\' escapes the next character ('>' and '\' must be escaped).
Parentheses nest at most NEST_LIMIT deep.
*/

use std::iter::{Enumerate, Peekable};
use std::str::Chars;

use crate::error::RegexError;
use crate::regex::node::{is_special, RegexNode, EMPTY_CHAR, EPSILON_CHARS};

type Res<T> = Result<T, RegexError>;

/// Maximum depth of nested parentheses
pub const NEST_LIMIT: usize = 200;

struct Parser<'a> {
    chars: Peekable<Enumerate<Chars<'a>>>, // (position in characters, character)
    depth: usize,                          // currently open parentheses
}

impl<'a> Parser<'a> {
    /// Next significant character without consuming it
    fn peek(&mut self) -> Option<(usize, char)> {
        while let Some(&(_, c)) = self.chars.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.chars.next();
        }
        self.chars.peek().copied()
    }

    fn missing_operand(&mut self) -> RegexError {
        match self.peek() {
            Some((position, _)) => RegexError::MissingOperand { position },
            None => RegexError::UnexpectedEnd,
        }
    }

    fn alternation(&mut self) -> Res<RegexNode> {
        let mut alternatives = vec![self.concatenation()?];
        while let Some((_, '|')) = self.peek() {
            self.chars.next();
            alternatives.push(self.concatenation()?);
        }
        Ok(RegexNode::union(alternatives))
    }

    fn concatenation(&mut self) -> Res<RegexNode> {
        let mut factors = Vec::new();
        while let Some((_, c)) = self.peek() {
            if c == '|' || c == ')' {
                break;
            }
            factors.push(self.starred()?);
        }
        if factors.is_empty() {
            return Err(self.missing_operand());
        }
        Ok(RegexNode::concat(factors))
    }

    fn starred(&mut self) -> Res<RegexNode> {
        let mut node = self.atom()?;
        while let Some((_, '*')) = self.peek() {
            self.chars.next();
            node = RegexNode::star(node);
        }
        Ok(node)
    }

    fn atom(&mut self) -> Res<RegexNode> {
        let (position, c) = self.chars.next().ok_or(RegexError::UnexpectedEnd)?;
        match c {
            '(' => {
                if self.depth >= NEST_LIMIT {
                    return Err(RegexError::NestingTooDeep { position });
                }
                self.depth += 1;
                let inner = self.alternation()?;
                match self.peek() {
                    Some((_, ')')) => {
                        self.chars.next();
                        self.depth -= 1;
                        Ok(inner)
                    }
                    Some((position, found)) => Err(RegexError::UnexpectedChar { position, found }),
                    None => Err(RegexError::UnclosedParen { position }),
                }
            }
            '\\' => match self.chars.next() {
                Some((_, escaped)) => Ok(RegexNode::literal(&escaped.to_string())),
                None => Err(RegexError::UnexpectedEnd),
            },
            '<' => {
                let mut name = String::new();
                loop {
                    match self.chars.next() {
                        Some((_, '>')) => break,
                        Some((_, '\\')) => match self.chars.next() {
                            Some((_, escaped)) => name.push(escaped),
                            None => return Err(RegexError::UnclosedLiteral { position }),
                        },
                        Some((_, c)) => name.push(c),
                        None => return Err(RegexError::UnclosedLiteral { position }),
                    }
                }
                if name.is_empty() {
                    return Err(RegexError::MissingOperand { position });
                }
                Ok(RegexNode::Literal(name))
            }
            EMPTY_CHAR => Ok(RegexNode::Empty),
            c if EPSILON_CHARS.contains(&c) => Ok(RegexNode::Epsilon),
            c if is_special(c) => Err(RegexError::UnexpectedChar { position, found: c }),
            c => Ok(RegexNode::literal(&c.to_string())),
        }
    }
}

/// Parses regex text into a tree. Errors carry the character position.
pub fn parse(text: &str) -> Res<RegexNode> {
    let mut parser = Parser {
        chars: text.chars().enumerate().peekable(),
        depth: 0,
    };
    let node = parser.alternation()?;
    match parser.peek() {
        Some((position, found)) => Err(RegexError::UnexpectedChar { position, found }),
        None => Ok(node),
    }
}
