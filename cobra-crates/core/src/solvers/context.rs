use log::trace;

use crate::basic_types::Clause;
use crate::cnf::ClauseSink;
use crate::cnf::EncodingKey;
use crate::cnf::TseitinEncoder;
use crate::cobra_assert_simple;
use crate::containers::HashSet;
use crate::containers::Trail;

#[derive(Clone, Debug)]
pub(crate) enum StoreEntry {
    Clause(Clause),
    /// The defining clauses of an encoded node, held by the encoder.
    Definition(EncodingKey),
}

/// The clauses asserted in a CNF-based solver, organised by context.
///
/// Definitions of encoded nodes live in the context in which they were first needed; once that
/// context is closed they are gone, and the encoder emits them again the next time they are
/// needed.
#[derive(Clone, Debug, Default)]
pub(crate) struct ContextStore {
    trail: Trail<StoreEntry>,
    defined: HashSet<EncodingKey>,
}

impl ContextStore {
    pub(crate) fn open(&mut self) {
        self.trail.new_checkpoint();
        trace!("opened context {}", self.trail.get_checkpoint());
    }

    pub(crate) fn close(&mut self) {
        let depth = self.trail.get_checkpoint();
        cobra_assert_simple!(depth > 0, "closing a context which was never opened");

        let defined = &mut self.defined;
        let mut num_removed = 0;
        for entry in self.trail.synchronise(depth - 1) {
            num_removed += 1;
            if let StoreEntry::Definition(key) = entry {
                let _ = defined.remove(&key);
            }
        }
        trace!("closed context {depth}, removing {num_removed} entries");
    }

    pub(crate) fn depth(&self) -> usize {
        self.trail.get_checkpoint()
    }

    /// Every clause currently asserted, in the order in which it was added.
    pub(crate) fn clauses<'a>(
        &'a self,
        encoder: &'a TseitinEncoder,
    ) -> impl Iterator<Item = &'a Clause> + 'a {
        self.trail.iter().flat_map(move |entry| match entry {
            StoreEntry::Clause(clause) => std::slice::from_ref(clause),
            StoreEntry::Definition(key) => encoder.definition(key),
        })
    }
}

impl ClauseSink for ContextStore {
    fn is_defined(&self, key: &EncodingKey) -> bool {
        self.defined.contains(key)
    }

    fn define(&mut self, key: &EncodingKey, _clauses: &[Clause]) {
        let _ = self.defined.insert(key.clone());
        self.trail.push(StoreEntry::Definition(key.clone()));
    }

    fn add_clause(&mut self, clause: Clause) {
        self.trail.push(StoreEntry::Clause(clause));
    }
}
