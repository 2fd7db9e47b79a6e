//! Enquiry form model and embedded-page message handling

use serde::{Deserialize, Serialize};

pub const DEFAULT_ENQUIRY_TITLE: &str = "Enquiry";
pub const SUCCESS_MESSAGE: &str = "Your enquiry has been received. One of our experienced consultants will be in touch with you shortly.";
pub const RETRY_MESSAGE: &str = "Please try again later";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EnquiryError {
    #[error("Please fill in all fields")]
    MissingFields(Vec<&'static str>),

    #[error("Invalid embedded page message: {0}")]
    InvalidMessage(String),
}

/// What an enquiry is about
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EnquiryResource {
    University {
        #[serde(rename = "resourceId")]
        resource_id: String,
    },
    Program {
        #[serde(rename = "resourceId")]
        resource_id: String,
    },
    General,
}

impl EnquiryResource {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::University { .. } => "university",
            Self::Program { .. } => "program",
            Self::General => "general",
        }
    }

    /// Empty for general enquiries.
    pub fn resource_id(&self) -> &str {
        match self {
            Self::University { resource_id } | Self::Program { resource_id } => resource_id,
            Self::General => "",
        }
    }

    /// Build a resource from its wire type name; unknown types become a
    /// university enquiry.
    pub fn from_parts(kind: Option<&str>, resource_id: Option<&str>) -> Self {
        let resource_id = resource_id.unwrap_or_default().to_string();
        match kind {
            Some("general") => Self::General,
            Some("program") => Self::Program { resource_id },
            _ => Self::University { resource_id },
        }
    }
}

/// Contact details typed by the user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnquiryForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

impl EnquiryForm {
    /// Every field must be non-blank.
    pub fn validate(&self) -> Result<(), EnquiryError> {
        let missing: Vec<&'static str> = [
            ("name", &self.name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("message", &self.message),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(EnquiryError::MissingFields(missing))
        }
    }
}

/// Ordered multipart fields for the enquiry endpoint.
pub fn enquiry_fields(
    form: &EnquiryForm,
    title: &str,
    resource: &EnquiryResource,
) -> Vec<(&'static str, String)> {
    vec![
        ("name", form.name.clone()),
        ("email", form.email.clone()),
        ("phone", form.phone.clone()),
        ("message", form.message.clone()),
        ("title", title.to_string()),
        ("resource", resource.kind().to_string()),
        ("resourceId", resource.resource_id().to_string()),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EventResource {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(rename = "resourceId", default)]
    pub resource_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

/// Message posted by an embedded page to open the enquiry form
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EnquiryEvent {
    #[serde(default)]
    pub event: Option<String>,
    pub resource: EventResource,
}

/// Resolved target of an enquiry event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnquiryTarget {
    pub title: String,
    pub resource: EnquiryResource,
}

impl EnquiryEvent {
    pub fn target(&self) -> EnquiryTarget {
        EnquiryTarget {
            title: self
                .resource
                .title
                .clone()
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| DEFAULT_ENQUIRY_TITLE.to_string()),
            resource: EnquiryResource::from_parts(
                self.resource.kind.as_deref(),
                self.resource.resource_id.as_deref(),
            ),
        }
    }
}

/// Parse the JSON string an embedded page posts back to the host.
pub fn parse_webview_message(raw: &str) -> Result<EnquiryEvent, EnquiryError> {
    serde_json::from_str(raw).map_err(|e| EnquiryError::InvalidMessage(e.to_string()))
}
