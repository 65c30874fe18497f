//! Derived facts about a formal language, shared by every representation of it.
//!
//! Languages live in a process-wide registry. A representation refers to its
//! language through a [`LanguageLink`]: the first representation that asks for a
//! cached fact creates the entry and holds the only [`LanguageOwner`]; values
//! derived from it (a Thompson automaton, a minimized automaton, a clone) hold a
//! [`LanguageLink::Shared`] identifier. Dropping the owner releases the entry and
//! bumps the slot generation, so stale identifiers resolve to nothing instead of
//! to a different language.

use std::collections::BTreeSet;

use lazy_static::lazy_static;
use log::debug;
use parking_lot::Mutex;

use crate::fa::state::FAState;
use crate::fa::transformation_monoid::TransformationMonoid;
use crate::symbol::Symbol;

/// Minimal DFA data as stored in the cache (no language link of its own)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinDfa {
    pub initial_state: usize,
    pub states: Vec<FAState>,
    pub alphabet: BTreeSet<Symbol>,
}

#[derive(Debug, Clone, Default)]
pub struct Language {
    alphabet: BTreeSet<Symbol>,
    pump_length: Option<usize>,
    min_dfa: Option<MinDfa>,
    syntactic_monoid: Option<TransformationMonoid>,
    nfa_minimum_size: Option<usize>, // lower bound on the size of any NFA for the language
    is_one_unambiguous: Option<bool>,
    one_unambiguous_regex: Option<String>,
}

fn missing(fact: &str) -> ! {
    panic!("{} requested before it was cached", fact)
}

impl Language {
    pub fn new(alphabet: BTreeSet<Symbol>) -> Self {
        Language {
            alphabet,
            ..Default::default()
        }
    }

    pub fn get_alphabet(&self) -> &BTreeSet<Symbol> {
        &self.alphabet
    }

    pub fn set_alphabet(&mut self, alphabet: BTreeSet<Symbol>) {
        self.alphabet = alphabet;
    }

    pub fn alphabet_size(&self) -> usize {
        self.alphabet.len()
    }

    pub fn is_pump_length_cached(&self) -> bool {
        self.pump_length.is_some()
    }

    pub fn set_pump_length(&mut self, pump_length: usize) {
        self.pump_length.get_or_insert(pump_length);
    }

    pub fn get_pump_length(&self) -> usize {
        self.pump_length.unwrap_or_else(|| missing("pump length"))
    }

    pub fn is_min_dfa_cached(&self) -> bool {
        self.min_dfa.is_some()
    }

    pub fn set_min_dfa(&mut self, min_dfa: MinDfa) {
        self.min_dfa.get_or_insert(min_dfa);
    }

    pub fn get_min_dfa(&self) -> &MinDfa {
        self.min_dfa
            .as_ref()
            .unwrap_or_else(|| missing("minimal DFA"))
    }

    pub fn is_syntactic_monoid_cached(&self) -> bool {
        self.syntactic_monoid.is_some()
    }

    pub fn set_syntactic_monoid(&mut self, monoid: TransformationMonoid) {
        self.syntactic_monoid.get_or_insert(monoid);
    }

    pub fn get_syntactic_monoid(&self) -> &TransformationMonoid {
        self.syntactic_monoid
            .as_ref()
            .unwrap_or_else(|| missing("syntactic monoid"))
    }

    pub fn is_nfa_minimum_size_cached(&self) -> bool {
        self.nfa_minimum_size.is_some()
    }

    pub fn set_nfa_minimum_size(&mut self, size: usize) {
        self.nfa_minimum_size.get_or_insert(size);
    }

    pub fn get_nfa_minimum_size(&self) -> usize {
        self.nfa_minimum_size
            .unwrap_or_else(|| missing("NFA minimum size"))
    }

    pub fn is_one_unambiguous_flag_cached(&self) -> bool {
        self.is_one_unambiguous.is_some()
    }

    pub fn set_one_unambiguous_flag(&mut self, flag: bool) {
        self.is_one_unambiguous.get_or_insert(flag);
    }

    pub fn get_one_unambiguous_flag(&self) -> bool {
        self.is_one_unambiguous
            .unwrap_or_else(|| missing("1-unambiguity flag"))
    }

    pub fn is_one_unambiguous_regex_cached(&self) -> bool {
        self.one_unambiguous_regex.is_some()
    }

    /// Stores the text of a 1-unambiguous regex for the language
    pub fn set_one_unambiguous_regex(&mut self, regex: String) {
        self.one_unambiguous_regex.get_or_insert(regex);
    }

    pub fn get_one_unambiguous_regex(&self) -> &str {
        self.one_unambiguous_regex
            .as_deref()
            .unwrap_or_else(|| missing("1-unambiguous regex"))
    }
}

/// Opaque handle of a registry entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LanguageId {
    slot: u32,
    generation: u32,
}

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    language: Option<Language>,
}

#[derive(Debug, Default)]
struct Registry {
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl Registry {
    fn insert(&mut self, language: Language) -> LanguageId {
        let slot = match self.free.pop() {
            Some(slot) => slot,
            None => {
                self.slots.push(Slot::default());
                (self.slots.len() - 1) as u32
            }
        };
        let entry = &mut self.slots[slot as usize];
        entry.language = Some(language);
        LanguageId {
            slot,
            generation: entry.generation,
        }
    }

    fn get_mut(&mut self, id: LanguageId) -> Option<&mut Language> {
        self.slots
            .get_mut(id.slot as usize)
            .filter(|entry| entry.generation == id.generation)
            .and_then(|entry| entry.language.as_mut())
    }

    fn release(&mut self, id: LanguageId) {
        if let Some(entry) = self.slots.get_mut(id.slot as usize) {
            if entry.generation == id.generation && entry.language.take().is_some() {
                entry.generation = entry.generation.wrapping_add(1);
                self.free.push(id.slot);
            }
        }
    }

    fn live(&self) -> usize {
        self.slots
            .iter()
            .filter(|entry| entry.language.is_some())
            .count()
    }
}

lazy_static! {
    static ref REGISTRY: Mutex<Registry> = Mutex::new(Registry::default());
}

/// Runs `f` on the language behind `id` with the registry locked.
/// Returns `None` when the owner has already been dropped.
///
/// `f` must not call back into the registry.
pub fn with_language<R>(id: LanguageId, f: impl FnOnce(&mut Language) -> R) -> Option<R> {
    let mut registry = REGISTRY.lock();
    registry.get_mut(id).map(f)
}

pub fn is_alive(id: LanguageId) -> bool {
    REGISTRY.lock().get_mut(id).is_some()
}

/// Number of languages currently registered
pub fn live_languages() -> usize {
    REGISTRY.lock().live()
}

/// The single owning handle of a registry entry; releases it on drop
#[derive(Debug)]
pub struct LanguageOwner {
    id: LanguageId,
}

impl LanguageOwner {
    pub fn register(language: Language) -> Self {
        let id = REGISTRY.lock().insert(language);
        debug!("registered language {:?}", id);
        LanguageOwner { id }
    }

    pub fn id(&self) -> LanguageId {
        self.id
    }
}

impl Drop for LanguageOwner {
    fn drop(&mut self) {
        debug!("releasing language {:?}", self.id);
        REGISTRY.lock().release(self.id);
    }
}

/// How a representation refers to its language
#[derive(Debug)]
pub enum LanguageLink {
    Owner(LanguageOwner),
    Shared(LanguageId),
}

impl LanguageLink {
    pub fn id(&self) -> LanguageId {
        match self {
            LanguageLink::Owner(owner) => owner.id(),
            LanguageLink::Shared(id) => *id,
        }
    }

    pub fn is_owner(&self) -> bool {
        matches!(self, LanguageLink::Owner(_))
    }

    /// A non-owning link to the same language
    pub fn share(&self) -> LanguageLink {
        LanguageLink::Shared(self.id())
    }
}

impl Clone for LanguageLink {
    // Ownership never duplicates: a copy of the owner only consults the language.
    fn clone(&self) -> Self {
        self.share()
    }
}

/// Resolves the language of a representation, registering a fresh one owned by
/// the representation if it has none yet.
pub(crate) fn attach(
    cell: &once_cell::sync::OnceCell<LanguageLink>,
    alphabet: impl FnOnce() -> BTreeSet<Symbol>,
) -> LanguageId {
    cell.get_or_init(|| LanguageLink::Owner(LanguageOwner::register(Language::new(alphabet()))))
        .id()
}

/// A link cell for a value derived from a representation: shares the language if
/// the source already has one.
pub(crate) fn derived(
    cell: &once_cell::sync::OnceCell<LanguageLink>,
) -> once_cell::sync::OnceCell<LanguageLink> {
    match cell.get() {
        Some(link) => once_cell::sync::OnceCell::with_value(link.share()),
        None => once_cell::sync::OnceCell::new(),
    }
}
