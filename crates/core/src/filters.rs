//! Filter composition for collection queries
//!
//! Pure functions that turn a [`FilterSet`] into the query-string fragments the
//! API and the in-app deep links understand. The API uses the bracket
//! convention (`filter[country]=Sweden`), deep links use flat keys
//! (`country=Sweden`).

use serde::{Deserialize, Serialize};

/// Filter keys accepted by `GET /programs`, in the order they are encoded.
pub const PROGRAM_FILTER_KEYS: [&str; 7] = [
    "name",
    "country",
    "city",
    "duration",
    "tuition",
    "program_type",
    "study_area",
];

/// Filter keys carried by a `/programs?...` deep link, in the order they are emitted.
pub const DEEP_LINK_KEYS: [&str; 6] = [
    "country",
    "study_area",
    "program_type",
    "tuition",
    "duration",
    "scholarship",
];

pub const DEFAULT_MIN_TUITION: u32 = 5000;
pub const DEFAULT_MAX_TUITION: u32 = 50000;

/// Duration buckets offered by the filter drawer (`value`, `label`).
pub const DURATION_OPTIONS: [(&str, &str); 4] = [
    ("1-12", "1 - 12 months"),
    ("12-18", "12 - 18 months"),
    ("18-24", "18 - 24 months"),
    ("gt24", "> 24 months"),
];

/// Program types offered by the filter drawer (`value`, `label`).
pub const PROGRAM_TYPE_OPTIONS: [(&str, &str); 6] = [
    ("bachelors", "Bachelors"),
    ("masters", "Masters"),
    ("phd", "PhD"),
    ("mba", "MBA"),
    ("research", "Research"),
    ("certification", "Certification"),
];

/// Immutable mapping of filter key to value.
///
/// Insertion order is preserved but never relied upon for encoding; encoders
/// walk their own allow-list instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSet {
    entries: Vec<(String, String)>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy with `key` set to `value`, replacing any previous value.
    pub fn with(&self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        let mut entries = self.entries.clone();
        match entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => entries.push((key, value)),
        }
        Self { entries }
    }

    /// Returns a copy without `key`.
    pub fn without(&self, key: &str) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .filter(|(k, _)| k != key)
                .cloned()
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Value for `key` when present and non-empty.
    pub fn active(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    /// True when no entry has a non-empty value.
    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(|(_, v)| v.is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FilterSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(FilterSet::new(), |set, (k, v)| set.with(k, v))
    }
}

fn encode_with<F>(filters: &FilterSet, allow_list: &[&str], escape: F) -> String
where
    F: Fn(&str) -> String,
{
    allow_list
        .iter()
        .filter_map(|key| {
            filters
                .active(key)
                .map(|value| format!("filter[{key}]={}", escape(value)))
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Encode active filters using the server-side bracket convention.
///
/// Keys are visited in `allow_list` order; unknown keys are ignored. Values are
/// passed through verbatim because the backend expects raw `|` and `-`
/// separators, so a value containing `&` or `=` will corrupt the query.
/// Use [`encode_filters_escaped`] when that compatibility is not needed.
pub fn encode_filters(filters: &FilterSet, allow_list: &[&str]) -> String {
    encode_with(filters, allow_list, str::to_string)
}

/// Same as [`encode_filters`], but percent-encodes every value.
pub fn encode_filters_escaped(filters: &FilterSet, allow_list: &[&str]) -> String {
    encode_with(filters, allow_list, |v| urlencoding::encode(v).into_owned())
}

/// Base URL of the programs collection for the given filters.
pub fn programs_url(api_base: &str, filters: &FilterSet) -> String {
    let base = format!("{}/programs", api_base.trim_end_matches('/'));
    let encoded = encode_filters(filters, &PROGRAM_FILTER_KEYS);
    if encoded.is_empty() {
        base
    } else {
        format!("{base}?{encoded}")
    }
}

/// Build the flat query string of a `/programs` deep link.
pub fn deep_link_query(filters: &FilterSet) -> String {
    DEEP_LINK_KEYS
        .iter()
        .filter_map(|key| {
            filters
                .active(key)
                .map(|value| format!("{key}={}", urlencoding::encode(value)))
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// `/programs` deep link for `filters`, without a dangling `?` when nothing
/// is active.
pub fn programs_link(filters: &FilterSet) -> String {
    let query = deep_link_query(filters);
    if query.is_empty() {
        "/programs".to_string()
    } else {
        format!("/programs?{query}")
    }
}

/// Read a deep-link query string (with or without a leading `?`) back into a
/// [`FilterSet`]. Keys outside [`DEEP_LINK_KEYS`] are dropped.
pub fn parse_deep_link(query: &str) -> FilterSet {
    query
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .filter(|(key, _)| DEEP_LINK_KEYS.contains(key))
        .filter_map(|(key, value)| {
            let value = value.replace('+', " ");
            let decoded = urlencoding::decode(&value).ok()?.into_owned();
            Some((key.to_string(), decoded))
        })
        .collect()
}

/// A filter shown as a removable chip above the programs list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedFilter {
    pub key: String,
    pub label: String,
    pub value: String,
}

/// Chips for the active deep-link filters, in display order.
pub fn applied_filters(filters: &FilterSet) -> Vec<AppliedFilter> {
    const LABELS: [(&str, &str); 6] = [
        ("country", "Country"),
        ("study_area", "Study Area"),
        ("program_type", "Program Type"),
        ("tuition", "Tuition"),
        ("duration", "Duration"),
        ("scholarship", "Scholarship"),
    ];

    LABELS
        .iter()
        .filter_map(|(key, label)| {
            filters.active(key).map(|value| AppliedFilter {
                key: key.to_string(),
                label: label.to_string(),
                value: value.to_string(),
            })
        })
        .collect()
}

/// Editable state of the programs filter drawer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramFilterDraft {
    pub country: Option<String>,
    pub study_area: Option<String>,
    pub durations: Vec<String>,
    pub program_types: Vec<String>,
    pub min_tuition: u32,
    pub max_tuition: u32,
    pub scholarship: bool,
}

impl Default for ProgramFilterDraft {
    fn default() -> Self {
        Self {
            country: None,
            study_area: None,
            durations: Vec::new(),
            program_types: Vec::new(),
            min_tuition: DEFAULT_MIN_TUITION,
            max_tuition: DEFAULT_MAX_TUITION,
            scholarship: false,
        }
    }
}

fn split_list(value: Option<&str>) -> Vec<String> {
    value
        .map(|v| v.split('|').filter(|s| !s.is_empty()).map(String::from).collect())
        .unwrap_or_default()
}

impl ProgramFilterDraft {
    /// Seed a draft from the filters currently applied to the list.
    ///
    /// A tuition value that is not a `min-max` pair of integers falls back to
    /// the default range.
    pub fn from_filters(filters: &FilterSet) -> Self {
        let (min_tuition, max_tuition) = filters
            .active("tuition")
            .and_then(|t| t.split_once('-'))
            .and_then(|(min, max)| Some((min.trim().parse().ok()?, max.trim().parse().ok()?)))
            .unwrap_or((DEFAULT_MIN_TUITION, DEFAULT_MAX_TUITION));

        Self {
            country: filters.active("country").map(String::from),
            study_area: filters.active("study_area").map(String::from),
            durations: split_list(filters.active("duration")),
            program_types: split_list(filters.active("program_type")),
            min_tuition,
            max_tuition,
            scholarship: filters.active("scholarship") == Some("true"),
        }
    }

    /// Toggle a duration bucket on or off.
    pub fn toggle_duration(mut self, value: &str) -> Self {
        toggle(&mut self.durations, value);
        self
    }

    /// Toggle a program type on or off.
    pub fn toggle_program_type(mut self, value: &str) -> Self {
        toggle(&mut self.program_types, value);
        self
    }

    /// Produce the filters to navigate to when the drawer is applied.
    pub fn apply(&self) -> FilterSet {
        let mut filters = FilterSet::new();
        if let Some(country) = self.country.as_deref().filter(|c| !c.is_empty()) {
            filters = filters.with("country", country);
        }
        if let Some(area) = self.study_area.as_deref().filter(|a| !a.is_empty()) {
            filters = filters.with("study_area", area);
        }
        if !self.durations.is_empty() {
            filters = filters.with("duration", self.durations.join("|"));
        }
        if !self.program_types.is_empty() {
            filters = filters.with("program_type", self.program_types.join("|"));
        }
        if self.scholarship {
            filters = filters.with("scholarship", "true");
        }
        if self.min_tuition != DEFAULT_MIN_TUITION || self.max_tuition != DEFAULT_MAX_TUITION {
            filters = filters.with("tuition", format!("{}-{}", self.min_tuition, self.max_tuition));
        }
        filters
    }
}

fn toggle(values: &mut Vec<String>, value: &str) {
    if let Some(pos) = values.iter().position(|v| v == value) {
        values.remove(pos);
    } else {
        values.push(value.to_string());
    }
}
