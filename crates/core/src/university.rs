//! Transformation functions for university records

use serde::{Deserialize, Serialize};

use crate::envelope::decode_records;

/// Gallery suffixes accepted as a card image.
///
/// The check is case-sensitive: `PHOTO.JPG` is rejected.
pub const IMAGE_SUFFIXES: [&str; 3] = [".jpg", ".jpeg", ".png"];

/// Tuition block shared by university and program payloads
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Tuition {
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CountryResponse {
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CityResponse {
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    pub country: CountryResponse,
}

/// University record from the API
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct UniversityResponse {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub city: Option<CityResponse>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub tuition: Option<Tuition>,
    #[serde(default)]
    pub international_students: Option<u64>,
    #[serde(default)]
    pub rank: Option<u32>,
    #[serde(default)]
    pub scholarship: Option<bool>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub ownership: Option<String>,
    #[serde(default)]
    pub gallery: Vec<String>,
}

/// Card size hint for rendering
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CardSize {
    Sm,
    #[default]
    Lg,
}

/// Display-ready university card
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UniversityCard {
    pub slug: String,
    pub name: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qs_rank: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scholarship: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub international_students: Option<u64>,
    pub image: String,
    pub size: CardSize,
}

/// First gallery entry, if it carries an accepted image suffix.
pub fn card_image(gallery: &[String]) -> Option<&str> {
    gallery
        .first()
        .filter(|first| IMAGE_SUFFIXES.iter().any(|suffix| first.ends_with(suffix)))
        .map(String::as_str)
}

/// `"<city> <country>"`, single space, no comma.
pub fn format_location(city: &CityResponse) -> String {
    format!("{} {}", city.name, city.country.name)
}

fn to_card(record: &UniversityResponse) -> Option<UniversityCard> {
    let image = card_image(&record.gallery)?;
    let slug = record.slug.as_deref().filter(|s| !s.is_empty())?;
    let name = record.name.as_deref().filter(|n| !n.is_empty())?;
    let city = record.city.as_ref()?;

    Some(UniversityCard {
        slug: slug.to_string(),
        name: name.to_string(),
        location: format_location(city),
        qs_rank: record.rank.filter(|r| *r > 0),
        scholarship: record
            .scholarship
            .filter(|s| *s)
            .map(|_| "Available".to_string()),
        international_students: record.international_students.filter(|n| *n > 0),
        image: image.to_string(),
        size: CardSize::default(),
    })
}

/// Transform university records into cards
///
/// Records without a usable gallery image, slug, name, or city are skipped.
/// Output order follows input order.
pub fn serialize_universities(records: &[UniversityResponse]) -> Vec<UniversityCard> {
    records.iter().filter_map(to_card).collect()
}

/// Decode raw JSON items and transform them into cards.
pub fn universities_from_values(items: Vec<serde_json::Value>) -> Vec<UniversityCard> {
    serialize_universities(&decode_records::<UniversityResponse>(items))
}

/// Listing endpoint for universities
pub fn universities_url(api_base: &str) -> String {
    format!("{}/universities", api_base.trim_end_matches('/'))
}

/// Name search endpoint. The query is trimmed and percent-encoded.
pub fn university_search_url(api_base: &str, query: &str) -> String {
    format!(
        "{}?filter[name]={}",
        universities_url(api_base),
        urlencoding::encode(query.trim())
    )
}
