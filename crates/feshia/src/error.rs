use feshia_core::enquiry::EnquiryError;
use feshia_core::locator::LocatorError;
use feshia_core::pagination::FetchError;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Request failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Unexpected response shape: {0}")]
    Shape(String),

    #[error(transparent)]
    Enquiry(#[from] EnquiryError),

    #[error(transparent)]
    Locator(#[from] LocatorError),
}
