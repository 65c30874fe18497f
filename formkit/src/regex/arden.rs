//! Conversion of an automaton into a regex by solving its system of language
//! equations `X_i = Σ a · X_j [| ε]`, one variable per state.

use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

use log::debug;

use crate::fa::finite_automaton::FiniteAutomaton;
use crate::regex::node::RegexNode;
use crate::symbol::Symbol;

/// `X = Σ coefficient · X_variable | constant`
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Equation {
    pub terms: BTreeMap<usize, RegexNode>, // variable -> coefficient
    pub constant: RegexNode,
}

impl Equation {
    fn add_term(&mut self, variable: usize, coefficient: RegexNode) {
        let merged = match self.terms.remove(&variable) {
            Some(existing) => RegexNode::union(vec![existing, coefficient]),
            None => coefficient,
        };
        if !merged.is_empty_language() {
            self.terms.insert(variable, merged);
        }
    }

    /// Arden's lemma: `X = A·X | B` has the least solution `X = A*·B`
    fn eliminate_self_reference(&mut self, variable: usize) {
        let Some(loop_coefficient) = self.terms.remove(&variable) else {
            return;
        };
        let star = RegexNode::star(loop_coefficient);
        for coefficient in self.terms.values_mut() {
            *coefficient = RegexNode::concat(vec![star.clone(), coefficient.clone()]);
        }
        self.constant = RegexNode::concat(vec![star, self.constant.clone()]);
    }

    /// Replaces `variable` by the right-hand side of its solved equation
    fn substitute(&mut self, variable: usize, solution: &Equation) {
        let Some(coefficient) = self.terms.remove(&variable) else {
            return;
        };
        for (&other, other_coefficient) in &solution.terms {
            self.add_term(
                other,
                RegexNode::concat(vec![coefficient.clone(), other_coefficient.clone()]),
            );
        }
        self.constant = RegexNode::union(vec![
            self.constant.clone(),
            RegexNode::concat(vec![coefficient, solution.constant.clone()]),
        ]);
    }
}

/// The equations of an automaton's useful states, keyed by state index
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ArdenSystem {
    pub initial: usize,
    pub equations: BTreeMap<usize, Equation>,
}

impl ArdenSystem {
    pub fn len(&self) -> usize {
        self.equations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.equations.is_empty()
    }
}

impl Display for ArdenSystem {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (variable, equation) in &self.equations {
            write!(f, "X{} =", variable)?;
            for (other, coefficient) in &equation.terms {
                write!(f, " ({})X{} |", coefficient, other)?;
            }
            writeln!(f, " {}", equation.constant)?;
        }
        Ok(())
    }
}

/// Builds the equation system of an automaton. Epsilon transitions are removed and
/// only states both reachable and leading to a terminal state get a variable.
pub fn arden_system_of(automaton: &FiniteAutomaton) -> ArdenSystem {
    let automaton = if automaton.has_epsilon_transitions() {
        automaton.remove_eps()
    } else {
        automaton.clone()
    };
    let initial = automaton.initial_state();
    let reachable = automaton.reachable_states(initial);
    let leading = automaton.leading_to_terminal_states();

    let mut equations = BTreeMap::new();
    if !leading.contains(&initial) {
        let empty = Equation {
            terms: BTreeMap::new(),
            constant: RegexNode::Empty,
        };
        equations.insert(initial, empty);
        return ArdenSystem { initial, equations };
    }

    for state in automaton.states() {
        if !reachable.contains(&state.index) || !leading.contains(&state.index) {
            continue;
        }
        let mut equation = Equation {
            terms: BTreeMap::new(),
            constant: if state.is_terminal {
                RegexNode::Epsilon
            } else {
                RegexNode::Empty
            },
        };
        for (symbol, to) in state.edges() {
            if let (Symbol::Literal(name), true) = (symbol, leading.contains(&to)) {
                equation.add_term(to, RegexNode::literal(name));
            }
        }
        equations.insert(state.index, equation);
    }
    ArdenSystem { initial, equations }
}

/// Solves the system by eliminating variables in decreasing index order, the
/// initial variable last. Returns the regex of the initial variable.
pub fn arden_to_regex(system: &ArdenSystem) -> RegexNode {
    let mut equations = system.equations.clone();
    let order: Vec<usize> = equations
        .keys()
        .rev()
        .copied()
        .filter(|&variable| variable != system.initial)
        .collect();

    for variable in order {
        let Some(mut solution) = equations.remove(&variable) else {
            continue;
        };
        solution.eliminate_self_reference(variable);
        for equation in equations.values_mut() {
            equation.substitute(variable, &solution);
        }
    }

    let result = match equations.remove(&system.initial) {
        Some(mut equation) => {
            equation.eliminate_self_reference(system.initial);
            equation.constant
        }
        None => RegexNode::Empty,
    };
    debug!(
        "solved {} equations into a regex of {} nodes",
        system.len(),
        result.size()
    );
    result
}
