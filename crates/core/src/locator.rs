//! Locators for pages rendered in the embedded browser view

use serde::Serialize;

/// Anchored sections of a university page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniversitySection {
    GeneralRequirements,
    AvailablePrograms,
    BasicInfo,
    About,
}

impl UniversitySection {
    pub const ALL: [UniversitySection; 4] = [
        Self::GeneralRequirements,
        Self::AvailablePrograms,
        Self::BasicInfo,
        Self::About,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GeneralRequirements => "general-entry-req",
            Self::AvailablePrograms => "available-programs",
            Self::BasicInfo => "basic-info",
            Self::About => "about",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == tag)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LocatorError {
    #[error("Missing '#' in program locator: {0}")]
    MissingFragment(String),

    #[error("Unknown university section in program locator: {0}")]
    UnknownSection(String),

    #[error("Malformed program locator: {0}")]
    Malformed(String),
}

/// Embedded page URL of a university, optionally scrolled to `fragment`.
pub fn university_page_url(site: &str, slug: &str, fragment: Option<&str>) -> String {
    let url = format!(
        "{}/universities/{slug}?webview=true",
        site.trim_end_matches('/')
    );
    match fragment.filter(|f| !f.is_empty()) {
        Some(fragment) => format!("{url}#{fragment}"),
        None => url,
    }
}

/// Embedded page URL of an article.
pub fn article_page_url(site: &str, slug: &str) -> String {
    format!("{}/articles/{slug}?webview=true", site.trim_end_matches('/'))
}

/// A program card slug split into its parts.
///
/// Program slugs look like `lund#available-programs_Masters_cs`: the part
/// before `#` is the university slug and the fragment addresses the program
/// inside that university's page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgramLocator {
    pub university_slug: String,
    pub section: &'static str,
    pub program_type: String,
    pub program_slug: String,
}

impl ProgramLocator {
    pub fn parse(composite: &str) -> Result<Self, LocatorError> {
        let (university_slug, fragment) = composite
            .split_once('#')
            .ok_or_else(|| LocatorError::MissingFragment(composite.to_string()))?;

        if university_slug.is_empty() {
            return Err(LocatorError::Malformed(composite.to_string()));
        }

        let (tag, rest) = fragment
            .split_once('_')
            .ok_or_else(|| LocatorError::Malformed(composite.to_string()))?;
        let section = UniversitySection::from_tag(tag)
            .filter(|s| *s == UniversitySection::AvailablePrograms)
            .ok_or_else(|| LocatorError::UnknownSection(tag.to_string()))?;

        // Program type names may contain underscores; program slugs never do.
        let (program_type, program_slug) = rest
            .rsplit_once('_')
            .filter(|(t, s)| !t.is_empty() && !s.is_empty())
            .ok_or_else(|| LocatorError::Malformed(composite.to_string()))?;

        Ok(Self {
            university_slug: university_slug.to_string(),
            section: section.as_str(),
            program_type: program_type.to_string(),
            program_slug: program_slug.to_string(),
        })
    }

    /// The URL fragment inside the university page.
    pub fn fragment(&self) -> String {
        format!("{}_{}_{}", self.section, self.program_type, self.program_slug)
    }

    pub fn page_url(&self, site: &str) -> String {
        university_page_url(site, &self.university_slug, Some(&self.fragment()))
    }
}
