//! Participant identity resolution.
//!
//! The registry is the single source of truth for institutional
//! affiliation: a mapping from trimmed participant name to an optional
//! institution. The extraction direction builds it from the document; the
//! reconciliation direction seeds it from the Participants sheet and then
//! mutates it incrementally while the remaining sheets resolve names, so
//! later sheets see earlier sheets' newly registered people.

use std::collections::BTreeMap;

use crate::model::{Document, ParticipantRef};
use crate::report::Report;
use crate::table::Cell;

/// Name → institution mapping. Iteration is sorted by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Registry {
    entries: BTreeMap<String, Option<String>>,
}

impl Registry {
    /// Builds the registry from every participant mention in the document:
    /// session presenters, paper authors, event presenters and
    /// screening-film creatives.
    pub fn from_document(document: &Document) -> Self {
        let mut registry = Self::default();

        for (_, session) in document.sessions.iter() {
            for presenter in &session.presenters {
                registry.observe(&presenter.name, presenter.institution.as_deref());
            }
            for paper in &session.papers {
                for author in &paper.authors {
                    registry.observe(&author.name, author.institution.as_deref());
                }
            }
        }

        for event in &document.events {
            if let Some(presenters) = &event.presenters {
                for presenter in presenters {
                    registry.observe(&presenter.name, presenter.institution.as_deref());
                }
            }
            if event.is_screening() {
                for film in event.films.as_deref().unwrap_or_default() {
                    for creative in &film.creatives {
                        registry.observe(&creative.name, creative.institution.as_deref());
                    }
                }
            }
        }

        registry
    }

    /// Records one observation of a participant. The first occurrence sets
    /// the institution; a later non-null value fills in a null one; a later
    /// null never clobbers a known institution.
    pub fn observe(&mut self, name: &str, institution: Option<&str>) {
        match self.entries.get_mut(name) {
            Some(existing) => {
                if existing.is_none() && institution.is_some() {
                    *existing = institution.map(str::to_string);
                }
            }
            None => {
                self.entries
                    .insert(name.to_string(), institution.map(str::to_string));
            }
        }
    }

    /// Unconditional insert, used when loading the Participants sheet where
    /// the later of two duplicate rows wins.
    pub fn insert(&mut self, name: impl Into<String>, institution: Option<String>) {
        self.entries.insert(name.into(), institution);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn institution(&self, name: &str) -> Option<&str> {
        self.entries.get(name).and_then(|value| value.as_deref())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries
            .iter()
            .map(|(name, institution)| (name.as_str(), institution.as_deref()))
    }

    /// Resolves one raw name token against the registry.
    ///
    /// Known names take their institution from the registry verbatim; any
    /// inline annotation on the token is discarded. Unknown names are
    /// registered (with the inline institution when one is present) and
    /// recorded in the report. Empty tokens resolve to `None`.
    pub fn resolve(&mut self, token: &str, report: &mut Report) -> Option<ParticipantRef> {
        let (name, inline) = parse_person(token);
        if name.is_empty() {
            return None;
        }

        if let Some(institution) = self.entries.get(&name) {
            return Some(ParticipantRef::new(name, institution.clone()));
        }

        self.entries.insert(name.clone(), inline.clone());
        report.record_new_participant(&name, inline.as_deref());
        Some(ParticipantRef::new(name, inline))
    }

    /// Resolves a `"; "`-joined list cell into participant references.
    pub fn resolve_list(&mut self, cell: &Cell, report: &mut Report) -> Vec<ParticipantRef> {
        split_names(&cell.clean_text())
            .into_iter()
            .filter_map(|token| self.resolve(token, report))
            .collect()
    }
}

/// Splits a `"; "`-joined list cell into trimmed, non-empty name tokens.
pub fn split_names(text: &str) -> Vec<&str> {
    text.split(';')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .collect()
}

/// Parses an optional trailing `Name (Institution)` annotation.
///
/// The parenthetical counts as an annotation only when it is the entire
/// tail of the token; a parenthetical anywhere else is literal text, so
/// `"Dr. Jane (Doe) Smith"` yields no institution.
pub fn parse_person(token: &str) -> (String, Option<String>) {
    let token = token.trim();
    if let Some(rest) = token.strip_suffix(')') {
        if let Some(open) = rest.rfind('(') {
            let name = rest[..open].trim_end();
            let institution = rest[open + 1..].trim();
            if !name.is_empty() && !institution.is_empty() {
                return (name.to_string(), Some(institution.to_string()));
            }
        }
    }
    (token.to_string(), None)
}
