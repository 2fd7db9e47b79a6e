//! Transformation functions for program records

use serde::{Deserialize, Serialize};

use crate::envelope::decode_records;
use crate::locator::UniversitySection;
use crate::university::{Tuition, UniversityResponse};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProgramTypeResponse {
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct StudyAreaResponse {
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
}

/// Program record from the API
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct ProgramResponse {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub tuition: Option<Tuition>,
    #[serde(default)]
    pub scholarship: Option<bool>,
    #[serde(default)]
    pub course_intensity: Option<String>,
    #[serde(default)]
    pub program_type: Option<ProgramTypeResponse>,
    #[serde(default)]
    pub study_area: Option<StudyAreaResponse>,
    #[serde(default)]
    pub university: Option<UniversityResponse>,
}

/// Display-ready program card
///
/// `slug` is a locator into the parent university page
/// (`<university>#available-programs_<type>_<program>`), not a program id.
/// Parse it with [`crate::locator::ProgramLocator`] before routing.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProgramCard {
    pub slug: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tuition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    pub scholarship: String,
    pub image: String,
}

/// `"<amount> <currency>"` when the amount is non-zero.
pub fn format_tuition(tuition: Option<&Tuition>) -> Option<String> {
    let tuition = tuition?;
    let amount = tuition.amount.filter(|a| *a != 0.0 && !a.is_nan())?;
    let currency = tuition.currency.as_deref().unwrap_or_default();
    Some(format!("{amount} {currency}").trim_end().to_string())
}

pub fn scholarship_label(scholarship: Option<bool>) -> &'static str {
    if scholarship.unwrap_or(false) {
        "Available"
    } else {
        "Not Available"
    }
}

/// Compose the deep-link slug of a program card.
pub fn program_slug(university_slug: &str, program_type: &str, program_slug: &str) -> String {
    format!(
        "{university_slug}#{}_{program_type}_{program_slug}",
        UniversitySection::AvailablePrograms.as_str()
    )
}

fn to_card(record: &ProgramResponse) -> Option<ProgramCard> {
    let name = record.name.as_deref().filter(|n| !n.is_empty())?;
    let slug = record.slug.as_deref().filter(|s| !s.is_empty())?;
    let university = record.university.as_ref()?;
    let image = university.gallery.first().filter(|g| !g.is_empty())?;
    let university_slug = university.slug.as_deref().filter(|s| !s.is_empty())?;
    let program_type = record.program_type.as_ref()?;

    Some(ProgramCard {
        slug: program_slug(university_slug, &program_type.name, slug),
        name: name.to_string(),
        tuition: format_tuition(record.tuition.as_ref()),
        duration: record.duration.clone().filter(|d| !d.is_empty()),
        scholarship: scholarship_label(record.scholarship).to_string(),
        image: image.clone(),
    })
}

/// Transform program records into cards
///
/// Records without a name, slug, program type, or a parent university with a
/// non-empty gallery are skipped.
pub fn serialize_programs(records: &[ProgramResponse]) -> Vec<ProgramCard> {
    records.iter().filter_map(to_card).collect()
}

/// Decode raw JSON items and transform them into cards.
pub fn programs_from_values(items: Vec<serde_json::Value>) -> Vec<ProgramCard> {
    serialize_programs(&decode_records::<ProgramResponse>(items))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn program(slug: &str) -> ProgramResponse {
        ProgramResponse {
            name: Some("Computer Science".to_string()),
            slug: Some(slug.to_string()),
            program_type: Some(ProgramTypeResponse {
                name: "Masters".to_string(),
                slug: None,
            }),
            university: Some(UniversityResponse {
                slug: Some("lund".to_string()),
                gallery: vec!["https://cdn.example/lund.webp".to_string()],
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_composite_slug() {
        let cards = serialize_programs(&[program("cs")]);
        assert_eq!(cards[0].slug, "lund#available-programs_Masters_cs");
    }

    #[test]
    fn test_image_is_first_gallery_entry_regardless_of_extension() {
        let cards = serialize_programs(&[program("cs")]);
        assert_eq!(cards[0].image, "https://cdn.example/lund.webp");
    }

    #[test]
    fn test_tuition_formatting() {
        let mut record = program("cs");
        record.tuition = Some(Tuition {
            amount: Some(12000.0),
            currency: Some("EUR".to_string()),
        });
        assert_eq!(serialize_programs(&[record])[0].tuition.as_deref(), Some("12000 EUR"));

        let mut zero = program("cs");
        zero.tuition = Some(Tuition {
            amount: Some(0.0),
            currency: Some("EUR".to_string()),
        });
        assert_eq!(serialize_programs(&[zero])[0].tuition, None);

        assert_eq!(serialize_programs(&[program("cs")])[0].tuition, None);
    }

    #[test]
    fn test_fractional_tuition() {
        let tuition = Tuition {
            amount: Some(9500.5),
            currency: Some("SEK".to_string()),
        };
        assert_eq!(format_tuition(Some(&tuition)).as_deref(), Some("9500.5 SEK"));
    }

    #[test]
    fn test_scholarship_label_never_absent() {
        let mut with = program("a");
        with.scholarship = Some(true);
        let without = program("b");

        let cards = serialize_programs(&[with, without]);

        assert_eq!(cards[0].scholarship, "Available");
        assert_eq!(cards[1].scholarship, "Not Available");
    }

    #[test]
    fn test_empty_duration_is_absent() {
        let mut record = program("cs");
        record.duration = Some(String::new());
        assert_eq!(serialize_programs(&[record])[0].duration, None);

        let mut record = program("cs");
        record.duration = Some("2 years".to_string());
        assert_eq!(serialize_programs(&[record])[0].duration.as_deref(), Some("2 years"));
    }

    #[test]
    fn test_invalid_records_are_dropped() {
        let mut no_name = program("a");
        no_name.name = None;
        let mut no_university = program("b");
        no_university.university = None;
        let mut empty_gallery = program("c");
        if let Some(u) = empty_gallery.university.as_mut() {
            u.gallery.clear();
        }
        let mut blank_image = program("d");
        if let Some(u) = blank_image.university.as_mut() {
            u.gallery = vec![String::new()];
        }
        let mut no_type = program("e");
        no_type.program_type = None;

        let cards = serialize_programs(&[
            no_name,
            no_university,
            empty_gallery,
            blank_image,
            no_type,
            program("ok"),
        ]);

        assert_eq!(cards.len(), 1);
        assert!(cards[0].slug.ends_with("_ok"));
    }

    #[test]
    fn test_programs_from_values() {
        let items = vec![json!({
            "name": "Law",
            "slug": "llm",
            "duration": null,
            "tuition": {"amount": 15000, "currency": "GBP"},
            "scholarship": false,
            "program_type": {"name": "Masters", "slug": "masters"},
            "study_area": {"name": "Law", "slug": "law"},
            "university": {"slug": "kcl", "gallery": ["kcl.jpg"]}
        })];

        let cards = programs_from_values(items);

        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].tuition.as_deref(), Some("15000 GBP"));
        assert_eq!(cards[0].slug, "kcl#available-programs_Masters_llm");
    }
}
