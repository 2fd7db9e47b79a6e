//! Home screen: featured feed and the quick program search

use serde::{Deserialize, Serialize};

use crate::article::{serialize_articles, ArticleCard, ArticleLayout, ArticleResponse};
use crate::envelope::decode_records;
use crate::filters::{deep_link_query, FilterSet};
use crate::university::{serialize_universities, UniversityCard, UniversityResponse};

/// `GET /homepage` payload
///
/// Records are kept raw so one malformed entry cannot sink the whole feed.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct HomepageResponse {
    #[serde(default)]
    pub universities: Vec<serde_json::Value>,
    #[serde(default)]
    pub articles: Vec<serde_json::Value>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct HomeFeed {
    pub universities: Vec<UniversityCard>,
    pub articles: Vec<ArticleCard>,
}

/// Featured universities and vertical article cards for the home screen.
pub fn transform_homepage(response: &HomepageResponse) -> HomeFeed {
    HomeFeed {
        universities: serialize_universities(&decode_records::<UniversityResponse>(
            response.universities.clone(),
        )),
        articles: serialize_articles(
            &decode_records::<ArticleResponse>(response.articles.clone()),
            ArticleLayout::Vertical,
        ),
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct NamedOption {
    pub name: String,
}

/// `GET /homepage/filters` payload
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct AvailableFilters {
    #[serde(default)]
    pub program_types: Vec<NamedOption>,
    #[serde(default)]
    pub destinations: Vec<NamedOption>,
    #[serde(default)]
    pub study_areas: Vec<NamedOption>,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq, Default)]
pub struct SearchOptions {
    pub program_types: Vec<SelectOption>,
    pub destinations: Vec<SelectOption>,
    pub study_areas: Vec<SelectOption>,
}

fn to_options(names: &[NamedOption]) -> Vec<SelectOption> {
    names
        .iter()
        .map(|n| SelectOption {
            label: n.name.clone(),
            value: n.name.to_lowercase(),
        })
        .collect()
}

pub fn transform_search_options(filters: &AvailableFilters) -> SearchOptions {
    SearchOptions {
        program_types: to_options(&filters.program_types),
        destinations: to_options(&filters.destinations),
        study_areas: to_options(&filters.study_areas),
    }
}

/// A field of the home search form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    StudyArea,
    Destination,
    ProgramType,
}

/// Selections made in the home search form.
///
/// Each selection returns a new value; nothing is shared between searches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HomeSearch {
    pub study_area: Option<String>,
    pub destination: Option<String>,
    pub program_type: Option<String>,
}

impl HomeSearch {
    /// Record a selection. Empty values leave the search unchanged.
    pub fn select(&self, field: SearchField, value: &str) -> Self {
        if value.is_empty() {
            return self.clone();
        }
        let value = Some(value.to_string());
        match field {
            SearchField::StudyArea => Self {
                study_area: value,
                ..self.clone()
            },
            SearchField::Destination => Self {
                destination: value,
                ..self.clone()
            },
            SearchField::ProgramType => Self {
                program_type: value,
                ..self.clone()
            },
        }
    }

    pub fn to_filters(&self) -> FilterSet {
        [
            ("country", &self.destination),
            ("study_area", &self.study_area),
            ("program_type", &self.program_type),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_ref().map(|v| (key, v.clone())))
        .collect()
    }

    /// `/programs?...` deep link, or `None` when nothing is selected.
    pub fn search_link(&self) -> Option<String> {
        let query = deep_link_query(&self.to_filters());
        if query.is_empty() {
            None
        } else {
            Some(format!("/programs?{query}"))
        }
    }
}
