use crate::kind::Kind;
use std::collections::HashMap;

/// Which kind currently owns each identifier
///
/// An identifier is listed here exactly when one submap holds a slot for it,
/// and the listed kind is that submap. `Storage` is the only writer.
#[derive(Debug, Default)]
pub(crate) struct DispatchIndex {
    owners: HashMap<String, Kind>,
}

impl DispatchIndex {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            owners: HashMap::with_capacity(capacity),
        }
    }

    pub(crate) fn owner(&self, identifier: &str) -> Option<Kind> {
        self.owners.get(identifier).copied()
    }

    /// Records `kind` as the owner and returns the previous owner, if any
    pub(crate) fn claim(&mut self, identifier: &str, kind: Kind) -> Option<Kind> {
        match self.owners.get_mut(identifier) {
            Some(owner) => Some(std::mem::replace(owner, kind)),
            None => {
                self.owners.insert(identifier.to_owned(), kind);
                None
            }
        }
    }

    /// Drops the entry, but only while `kind` is still the owner
    pub(crate) fn release(&mut self, identifier: &str, kind: Kind) -> bool {
        if self.owner(identifier) == Some(kind) {
            self.owners.remove(identifier);
            true
        } else {
            false
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.owners.len()
    }

    #[cfg(test)]
    pub(crate) fn iter(&self) -> impl Iterator<Item = (&str, Kind)> {
        self.owners.iter().map(|(id, kind)| (id.as_str(), *kind))
    }
}
