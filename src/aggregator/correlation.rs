//! Fragment storage
//!
//! Holds raw response fragments until they are looked up. Decoding happens
//! on lookup so that one malformed fragment never affects another.
//!
//! Every fragment is stored against the [`SubRequest`] that produced it, so a
//! request queued with a non-canonical sub-URL is still found by its kind and
//! key.

use super::types::{CorrelationKey, CorrelationStrategy, RequestKind, SubRequest};
use crate::error::{ApiErrorBody, Error, Result};
use crate::types::JsonValue;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Items attributed to one story by one sub-URL
#[derive(Debug, Clone, PartialEq)]
struct Part {
    source: String,
    /// The sub-URL was queued for this very story
    own: bool,
    value: JsonValue,
}

/// Everything received for one kind of one story, by source sub-URL
#[derive(Debug, Clone, Default, PartialEq)]
struct Slot {
    parts: Vec<Part>,
}

impl Slot {
    /// Replace what `source` contributed earlier, or add it
    fn put(&mut self, source: &str, own: bool, value: JsonValue) {
        match self.parts.iter_mut().find(|p| p.source == source) {
            Some(part) => {
                part.own = own;
                part.value = value;
            }
            None => self.parts.push(Part {
                source: source.to_string(),
                own,
                value,
            }),
        }
    }

    fn forget(&mut self, source: &str) {
        self.parts.retain(|p| p.source != source);
    }

    fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// The slot as one fragment.
    ///
    /// A story is the latest part from its own sub-URL. Collections are the
    /// own parts followed by items other sub-URLs carried for this story; a
    /// non-array own part (an error object) is returned as is.
    fn merged(&self, kind: RequestKind) -> Option<JsonValue> {
        if self.parts.is_empty() {
            return None;
        }
        if kind == RequestKind::Story {
            return self
                .parts
                .iter()
                .rev()
                .find(|p| p.own)
                .or(self.parts.last())
                .map(|p| p.value.clone());
        }

        let ordered = self
            .parts
            .iter()
            .filter(|p| p.own)
            .chain(self.parts.iter().filter(|p| !p.own));
        let mut items = Vec::new();
        for part in ordered {
            match &part.value {
                JsonValue::Array(values) => items.extend(values.iter().cloned()),
                other => return Some(other.clone()),
            }
        }
        Some(JsonValue::Array(items))
    }
}

/// Raw fragments about one story
#[derive(Debug, Clone, Default, PartialEq)]
pub(super) struct RawBundle {
    story: Slot,
    comments: Slot,
    reviews: Slot,
}

impl RawBundle {
    fn slot(&self, kind: RequestKind) -> &Slot {
        match kind {
            RequestKind::Story => &self.story,
            RequestKind::Comments => &self.comments,
            RequestKind::Reviews => &self.reviews,
        }
    }

    fn slot_mut(&mut self, kind: RequestKind) -> &mut Slot {
        match kind {
            RequestKind::Story => &mut self.story,
            RequestKind::Comments => &mut self.comments,
            RequestKind::Reviews => &mut self.reviews,
        }
    }

    fn is_empty(&self) -> bool {
        self.story.is_empty() && self.comments.is_empty() && self.reviews.is_empty()
    }

    /// Raw fragment for one part of the story
    pub fn part(&self, kind: RequestKind) -> Option<JsonValue> {
        self.slot(kind).merged(kind)
    }
}

#[derive(Debug, Clone)]
enum Store {
    ByUrl(HashMap<String, JsonValue>),
    ById(HashMap<u64, RawBundle>),
}

/// Fragment store for one correlation strategy
#[derive(Debug, Clone)]
pub(super) struct Correlation {
    store: Store,
    /// Sub-URL each answered request was last sent as
    sent: HashMap<(RequestKind, CorrelationKey), String>,
    /// Request each answered sub-URL was queued for
    requests: HashMap<String, (RequestKind, CorrelationKey)>,
}

impl Correlation {
    pub fn new(strategy: CorrelationStrategy) -> Self {
        let store = match strategy {
            CorrelationStrategy::ByUrl => Store::ByUrl(HashMap::new()),
            CorrelationStrategy::ById => Store::ById(HashMap::new()),
        };
        Self {
            store,
            sent: HashMap::new(),
            requests: HashMap::new(),
        }
    }

    pub fn strategy(&self) -> CorrelationStrategy {
        match self.store {
            Store::ByUrl(_) => CorrelationStrategy::ByUrl,
            Store::ById(_) => CorrelationStrategy::ById,
        }
    }

    /// Number of stored entries (sub-URLs or story bundles)
    pub fn len(&self) -> usize {
        match &self.store {
            Store::ByUrl(fragments) => fragments.len(),
            Store::ById(bundles) => bundles.len(),
        }
    }

    /// Store the fragment answering `request`. A later fragment for the same
    /// sub-URL replaces the earlier one.
    pub fn absorb(&mut self, request: &SubRequest, fragment: JsonValue) {
        self.sent
            .insert((request.kind, request.key), request.path.clone());
        self.requests
            .insert(request.path.clone(), (request.kind, request.key));

        match &mut self.store {
            Store::ByUrl(fragments) => {
                fragments.insert(request.path.clone(), fragment);
            }
            Store::ById(bundles) => absorb_by_id(bundles, request, fragment),
        }
    }

    /// Sub-URL an answered request was sent as
    pub fn sent_path(&self, kind: RequestKind, key: CorrelationKey) -> Option<&str> {
        self.sent.get(&(kind, key)).map(String::as_str)
    }

    /// Raw fragment for a queued kind and key
    pub fn lookup(&self, kind: RequestKind, key: CorrelationKey) -> Option<JsonValue> {
        match &self.store {
            Store::ByUrl(fragments) => self
                .sent_path(kind, key)
                .and_then(|path| fragments.get(path))
                .cloned(),
            Store::ById(bundles) => bundles
                .get(&key.story_id())
                .and_then(|bundle| bundle.part(kind)),
        }
    }

    /// Kind and raw fragment for a sub-URL as it was queued
    pub fn lookup_path(&self, path: &str) -> Option<(RequestKind, JsonValue)> {
        let &(kind, key) = self.requests.get(path)?;
        let fragment = match &self.store {
            Store::ByUrl(fragments) => fragments.get(path).cloned(),
            Store::ById(_) => self.lookup(kind, key),
        }?;
        Some((kind, fragment))
    }

    /// Raw bundle for a story; only meaningful under ID correlation
    pub fn bundle(&self, story_id: u64) -> Result<Option<&RawBundle>> {
        match &self.store {
            Store::ByUrl(_) => Err(Error::correlation(
                "story bundles require ID correlation",
            )),
            Store::ById(bundles) => Ok(bundles.get(&story_id)),
        }
    }

    /// Story IDs with at least one fragment, ascending
    pub fn story_ids(&self) -> Vec<u64> {
        let mut ids: Vec<u64> = match &self.store {
            Store::ByUrl(_) => self.sent.keys().map(|(_, key)| key.story_id()).collect(),
            Store::ById(bundles) => bundles.keys().copied().collect(),
        };
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}

/// Split a fragment into per-story parts.
///
/// Stories are keyed by their own `id`, collection items by their
/// `story_id`. Whatever carries no ID (empty arrays, error objects) belongs
/// to the story the request was queued for.
fn absorb_by_id(bundles: &mut HashMap<u64, RawBundle>, request: &SubRequest, fragment: JsonValue) {
    let kind = request.kind;
    let requested = request.key.story_id();
    let source = request.path.as_str();

    // Drop what this sub-URL contributed before, wherever it went
    for bundle in bundles.values_mut() {
        bundle.slot_mut(kind).forget(source);
    }
    bundles.retain(|_, bundle| !bundle.is_empty());

    let mut put = |story_id: u64, value: JsonValue| {
        if story_id != requested {
            debug!(source, story_id, kind = %kind, "Fragment attributed to another story");
        }
        bundles
            .entry(story_id)
            .or_default()
            .slot_mut(kind)
            .put(source, story_id == requested, value);
    };

    match (kind, fragment) {
        (RequestKind::Story, fragment) => {
            let story_id = positive_u64(&fragment, "id").unwrap_or(requested);
            put(story_id, fragment);
        }
        (_, JsonValue::Array(items)) if !items.is_empty() => {
            let mut groups: BTreeMap<u64, Vec<JsonValue>> = BTreeMap::new();
            for item in items {
                let story_id = positive_u64(&item, "story_id").unwrap_or(requested);
                groups.entry(story_id).or_default().push(item);
            }
            for (story_id, items) in groups {
                put(story_id, JsonValue::Array(items));
            }
        }
        (_, fragment) => put(requested, fragment),
    }
}

fn positive_u64(value: &JsonValue, field: &str) -> Option<u64> {
    value
        .get(field)
        .and_then(JsonValue::as_u64)
        .filter(|id| *id != 0)
}

/// Fail if the fragment is an API error object
pub(super) fn check_fragment(value: &JsonValue, key: &str) -> Result<()> {
    if value.get("kind").and_then(JsonValue::as_str) != Some("error") {
        return Ok(());
    }
    let body: ApiErrorBody = serde_json::from_value(value.clone())?;
    Err(Error::fragment(key, body))
}
