use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// A denormalized reference to a participant, embedded wherever the
/// programme mentions a person. The institution is a copy of the registry
/// value at reconciliation time, not a live reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantRef {
    pub name: String,
    #[serde(default)]
    pub institution: Option<String>,
}

impl ParticipantRef {
    pub fn new(name: impl Into<String>, institution: Option<String>) -> Self {
        Self {
            name: name.into(),
            institution,
        }
    }
}

/// A paper presented within a session. Owned exclusively by its parent
/// session; order is document order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paper {
    #[serde(default)]
    pub title: String,
    #[serde(rename = "abstract", default)]
    pub abstract_text: String,
    #[serde(default)]
    pub authors: Vec<ParticipantRef>,
}

/// A programme session. The session id lives as the [`SessionMap`] key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub presenters: Vec<ParticipantRef>,
    #[serde(default)]
    pub papers: Vec<Paper>,
}

/// A film shown in a screening slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Film {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub year: Option<i64>,
    #[serde(default)]
    pub duration: Option<i64>,
    #[serde(default)]
    pub creatives: Vec<ParticipantRef>,
}

/// A timetable entry. `presenters`, `abstract`, `affiliation` and `films`
/// are emitted only when present; the remaining fields always appear, with
/// explicit nulls where no value exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(default)]
    pub day: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub venue: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub session_num: Option<String>,
    #[serde(default)]
    pub headshot_url: Option<Value>,
    #[serde(default)]
    pub logo_url: Option<Value>,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presenters: Option<Vec<ParticipantRef>>,
    #[serde(rename = "abstract", default, skip_serializing_if = "Option::is_none")]
    pub abstract_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affiliation: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub films: Option<Vec<Film>>,
}

impl Event {
    /// Slot label used to pair screening events with their film rows.
    pub fn slot_key(&self) -> String {
        format!("{} - {} - {}", self.day, self.time, self.venue)
    }

    pub fn is_screening(&self) -> bool {
        self.kind == "screening"
    }
}

/// Sessions keyed by their numeric-ish id. Entries iterate and serialise
/// sorted by numeric id, with non-numeric ids after the numeric ones.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct SessionMap(BTreeMap<String, Session>);

impl SessionMap {
    pub fn insert(&mut self, id: impl Into<String>, session: Session) {
        self.0.insert(id.into(), session);
    }

    pub fn get(&self, id: &str) -> Option<&Session> {
        self.0.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Session> {
        self.0.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates entries in emission order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Session)> {
        let mut entries: Vec<_> = self.0.iter().collect();
        entries.sort_by(|(lhs, _), (rhs, _)| compare_session_ids(lhs, rhs));
        entries.into_iter()
    }

    /// Total paper count across all sessions.
    pub fn paper_count(&self) -> usize {
        self.0.values().map(|session| session.papers.len()).sum()
    }

    /// Rebuilds the description index from the non-empty session
    /// descriptions.
    pub fn panel_descriptions(&self) -> BTreeMap<String, String> {
        self.0
            .iter()
            .filter(|(_, session)| !session.description.is_empty())
            .map(|(id, session)| (id.clone(), session.description.clone()))
            .collect()
    }
}

impl Serialize for SessionMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (id, session) in self.iter() {
            map.serialize_entry(id, session)?;
        }
        map.end()
    }
}

impl FromIterator<(String, Session)> for SessionMap {
    fn from_iter<I: IntoIterator<Item = (String, Session)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

fn compare_session_ids(lhs: &str, rhs: &str) -> Ordering {
    match (lhs.parse::<i64>(), rhs.parse::<i64>()) {
        (Ok(lhs), Ok(rhs)) => lhs.cmp(&rhs),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => lhs.cmp(rhs),
    }
}

/// The normalized programme document. Struct field order fixes the JSON
/// key order on output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub conference: Value,
    #[serde(default)]
    pub venues: Value,
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub sessions: SessionMap,
    #[serde(default)]
    pub panel_descriptions: BTreeMap<String, String>,
}

impl Document {
    pub fn screening_count(&self) -> usize {
        self.events.iter().filter(|event| event.is_screening()).count()
    }

    pub fn film_count(&self) -> usize {
        self.events
            .iter()
            .filter(|event| event.is_screening())
            .filter_map(|event| event.films.as_ref())
            .map(Vec::len)
            .sum()
    }
}
