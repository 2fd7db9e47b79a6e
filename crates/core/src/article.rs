//! Transformation functions for article records

use serde::{Deserialize, Serialize};

use crate::envelope::decode_records;

/// Article tabs offered on the articles screen.
pub const ARTICLE_KINDS: [&str; 2] = ["students", "institutions"];

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CategoryResponse {
    pub name: String,
}

/// Article record from the API
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct ArticleResponse {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub categories: Vec<CategoryResponse>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub feature_image: Option<String>,
}

/// Presentation hint carried with each article card
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ArticleLayout {
    #[default]
    Horizontal,
    Vertical,
}

impl std::str::FromStr for ArticleLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "horizontal" => Ok(Self::Horizontal),
            "vertical" => Ok(Self::Vertical),
            other => Err(format!(
                "Invalid layout: {other}. Valid layouts: horizontal, vertical"
            )),
        }
    }
}

/// Display-ready article card
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ArticleCard {
    pub slug: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub image: String,
    /// Passed through as received; never parsed.
    pub created_at: String,
    pub layout: ArticleLayout,
}

fn to_card(record: &ArticleResponse, layout: ArticleLayout) -> Option<ArticleCard> {
    let image = record.feature_image.as_deref().filter(|i| !i.is_empty())?;
    let slug = record.slug.as_deref().filter(|s| !s.is_empty())?;
    let title = record.title.as_deref().filter(|t| !t.is_empty())?;
    // An article without categories has no type to show.
    let kind = record.categories.first()?;

    Some(ArticleCard {
        slug: slug.to_string(),
        title: title.to_string(),
        kind: kind.name.clone(),
        image: image.to_string(),
        created_at: record.created_at.clone().unwrap_or_default(),
        layout,
    })
}

/// Transform article records into cards with the given layout
///
/// Records without a feature image, slug, title, or at least one category are
/// skipped.
pub fn serialize_articles(records: &[ArticleResponse], layout: ArticleLayout) -> Vec<ArticleCard> {
    records
        .iter()
        .filter_map(|record| to_card(record, layout))
        .collect()
}

/// Decode raw JSON items and transform them into horizontal cards.
pub fn articles_from_values(items: Vec<serde_json::Value>) -> Vec<ArticleCard> {
    serialize_articles(
        &decode_records::<ArticleResponse>(items),
        ArticleLayout::default(),
    )
}

/// Collection URL for the articles screen, optionally narrowed to one tab.
pub fn articles_url(api_base: &str, kind: Option<&str>) -> String {
    let base = format!("{}/articles", api_base.trim_end_matches('/'));
    match kind.filter(|k| !k.is_empty()) {
        Some(kind) => format!("{base}?filter[type]={kind}"),
        None => base,
    }
}
