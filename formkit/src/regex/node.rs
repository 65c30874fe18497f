use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter};

use crate::symbol::Symbol;

pub const EPSILON_CHARS: [char; 2] = ['ε', 'ϵ'];
pub const EMPTY_CHAR: char = '∅';

/// Characters that cannot stand for themselves in regex text
pub(crate) fn is_special(c: char) -> bool {
    matches!(c, '|' | '*' | '(' | ')' | '\\' | '<' | '>' | EMPTY_CHAR)
        || EPSILON_CHARS.contains(&c)
        || c.is_whitespace()
}

/// A regular expression tree
#[derive(Debug, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum RegexNode {
    Empty,   // the empty language
    Epsilon, // the empty word
    Literal(String),
    Concat(Vec<RegexNode>),
    Union(Vec<RegexNode>),
    Star(Box<RegexNode>),
}

impl RegexNode {
    /// A literal symbol; the name must not be empty
    pub fn literal(name: &str) -> Self {
        debug_assert!(!name.is_empty(), "literal names are never empty");
        RegexNode::Literal(name.to_string())
    }

    /// Concatenation, simplified: nested concatenations are flattened, epsilon
    /// factors dropped, and any empty-language factor absorbs the whole product.
    pub fn concat(parts: Vec<RegexNode>) -> Self {
        let mut factors = Vec::with_capacity(parts.len());
        for part in parts {
            match part {
                RegexNode::Empty => return RegexNode::Empty,
                RegexNode::Epsilon => {}
                RegexNode::Concat(inner) => factors.extend(inner),
                other => factors.push(other),
            }
        }
        match factors.len() {
            0 => RegexNode::Epsilon,
            1 => factors.pop().unwrap_or(RegexNode::Epsilon),
            _ => RegexNode::Concat(factors),
        }
    }

    /// Union, simplified: nested unions are flattened, empty-language alternatives
    /// dropped, and the remaining alternatives sorted and deduplicated.
    pub fn union(parts: Vec<RegexNode>) -> Self {
        let mut alternatives = Vec::with_capacity(parts.len());
        for part in parts {
            match part {
                RegexNode::Empty => {}
                RegexNode::Union(inner) => alternatives.extend(inner),
                other => alternatives.push(other),
            }
        }
        alternatives.sort();
        alternatives.dedup();
        match alternatives.len() {
            0 => RegexNode::Empty,
            1 => alternatives.pop().unwrap_or(RegexNode::Empty),
            _ => RegexNode::Union(alternatives),
        }
    }

    /// Kleene star, simplified: `∅*` and `ε*` are `ε`, and `(r*)*` is `r*`
    pub fn star(inner: RegexNode) -> Self {
        match inner {
            RegexNode::Empty | RegexNode::Epsilon => RegexNode::Epsilon,
            star @ RegexNode::Star(_) => star,
            other => RegexNode::Star(Box::new(other)),
        }
    }

    pub fn is_empty_language(&self) -> bool {
        matches!(self, RegexNode::Empty)
    }

    /// The literal symbols occurring in the tree
    pub fn alphabet(&self) -> BTreeSet<Symbol> {
        let mut alphabet = BTreeSet::new();
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            match node {
                RegexNode::Empty | RegexNode::Epsilon => {}
                RegexNode::Literal(name) => {
                    alphabet.insert(Symbol::new(name));
                }
                RegexNode::Concat(children) | RegexNode::Union(children) => {
                    pending.extend(children.iter())
                }
                RegexNode::Star(inner) => pending.push(inner),
            }
        }
        alphabet
    }

    /// Number of nodes in the tree
    pub fn size(&self) -> usize {
        let mut size = 0;
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            size += 1;
            match node {
                RegexNode::Concat(children) | RegexNode::Union(children) => {
                    pending.extend(children.iter())
                }
                RegexNode::Star(inner) => pending.push(inner),
                _ => {}
            }
        }
        size
    }

    fn needs_parentheses(&self, child: &RegexNode) -> bool {
        match self {
            RegexNode::Concat(_) => {
                matches!(child, RegexNode::Union(children) if !children.is_empty())
            }
            RegexNode::Star(_) => match child {
                RegexNode::Concat(children) | RegexNode::Union(children) => !children.is_empty(),
                RegexNode::Star(_) => true,
                _ => false,
            },
            _ => false,
        }
    }
}

fn write_literal(f: &mut Formatter<'_>, name: &str) -> fmt::Result {
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if is_special(c) => write!(f, "\\{}", c),
        (Some(c), None) => write!(f, "{}", c),
        _ => {
            f.write_str("<")?;
            for c in name.chars() {
                if c == '>' || c == '\\' {
                    f.write_str("\\")?;
                }
                write!(f, "{}", c)?;
            }
            f.write_str(">")
        }
    }
}

impl Display for RegexNode {
    /// Prints the tree with the fewest parentheses the precedence rules allow.
    /// The output parses back to a tree of the same language.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        enum Task<'a> {
            Node(&'a RegexNode),
            Text(&'static str),
        }

        let mut tasks = vec![Task::Node(self)];
        while let Some(task) = tasks.pop() {
            let node = match task {
                Task::Text(text) => {
                    f.write_str(text)?;
                    continue;
                }
                Task::Node(node) => node,
            };
            let children: &[RegexNode] = match node {
                RegexNode::Empty => {
                    write!(f, "{}", EMPTY_CHAR)?;
                    continue;
                }
                RegexNode::Epsilon => {
                    write!(f, "{}", EPSILON_CHARS[0])?;
                    continue;
                }
                RegexNode::Literal(name) => {
                    write_literal(f, name)?;
                    continue;
                }
                RegexNode::Concat(children) if children.is_empty() => {
                    write!(f, "{}", EPSILON_CHARS[0])?;
                    continue;
                }
                RegexNode::Union(children) if children.is_empty() => {
                    write!(f, "{}", EMPTY_CHAR)?;
                    continue;
                }
                RegexNode::Concat(children) | RegexNode::Union(children) => children,
                RegexNode::Star(inner) => {
                    tasks.push(Task::Text("*"));
                    std::slice::from_ref(inner.as_ref())
                }
            };

            // Pushed in reverse so the first child is printed first
            let separator = if matches!(node, RegexNode::Union(_)) { "|" } else { "" };
            for (position, child) in children.iter().enumerate().rev() {
                if node.needs_parentheses(child) {
                    tasks.push(Task::Text(")"));
                    tasks.push(Task::Node(child));
                    tasks.push(Task::Text("("));
                } else {
                    tasks.push(Task::Node(child));
                }
                if position > 0 && !separator.is_empty() {
                    tasks.push(Task::Text(separator));
                }
            }
        }
        Ok(())
    }
}
