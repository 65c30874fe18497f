use std::fmt::{Display, Formatter};

/// Kind tags attached to values by an interpreting front end
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum ObjectKind {
    Nfa,
    Dfa,
    Regex,
    RandomRegex,
    Int,
    String,
    Boolean,
    OptionalBool,
    AmbiguityValue,
    PrefixGrammar,
    Array,
}

impl ObjectKind {
    pub const ALL: [ObjectKind; 11] = [
        ObjectKind::Nfa,
        ObjectKind::Dfa,
        ObjectKind::Regex,
        ObjectKind::RandomRegex,
        ObjectKind::Int,
        ObjectKind::String,
        ObjectKind::Boolean,
        ObjectKind::OptionalBool,
        ObjectKind::AmbiguityValue,
        ObjectKind::PrefixGrammar,
        ObjectKind::Array,
    ];

    /// Direct supertypes
    pub fn parents(self) -> &'static [ObjectKind] {
        match self {
            ObjectKind::Dfa => &[ObjectKind::Nfa],
            _ => &[],
        }
    }

    /// Direct subtypes
    pub fn children(self) -> Vec<ObjectKind> {
        ObjectKind::ALL
            .into_iter()
            .filter(|kind| kind.parents().contains(&self))
            .collect()
    }

    /// Reflexive, transitive subtype check
    pub fn is_subtype_of(self, other: ObjectKind) -> bool {
        let mut pending = vec![self];
        while let Some(kind) = pending.pop() {
            if kind == other {
                return true;
            }
            pending.extend_from_slice(kind.parents());
        }
        false
    }

    pub fn name(self) -> &'static str {
        match self {
            ObjectKind::Nfa => "NFA",
            ObjectKind::Dfa => "DFA",
            ObjectKind::Regex => "Regex",
            ObjectKind::RandomRegex => "RandomRegex",
            ObjectKind::Int => "Int",
            ObjectKind::String => "String",
            ObjectKind::Boolean => "Boolean",
            ObjectKind::OptionalBool => "OptionalBool",
            ObjectKind::AmbiguityValue => "AmbiguityValue",
            ObjectKind::PrefixGrammar => "PrefixGrammar",
            ObjectKind::Array => "Array",
        }
    }
}

impl Display for ObjectKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
