//! Core library for feshia
//!
//! This crate implements the **Functional Core** of the feshia client,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! The project uses a two-crate architecture to enforce separation of concerns:
//!
//! - **`feshia_core`** (this crate): Pure transformation functions with zero I/O
//! - **`feshia`**: HTTP, timers, and orchestration (the Imperative Shell)
//!
//! All functions in this crate are deterministic: the same API payload always
//! produces the same cards, the same filters always produce the same query
//! string. They are tested with literal fixtures, no network required.
//!
//! # Module Organization
//!
//! - [`filters`]: Filter sets, API query encoding, deep-link queries, filter drawer state
//! - [`envelope`]: Extraction of item arrays from the API's response envelopes
//! - [`university`], [`program`], [`article`]: API records and their card view-models
//! - [`home`]: Home feed and the quick program search
//! - [`pagination`]: Page accumulation state machine with stale-response detection
//! - [`locator`]: Embedded page URLs and program deep-link locators
//! - [`enquiry`]: Enquiry form validation, multipart fields, embedded page messages
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use feshia_core::envelope::normalize;
//! use feshia_core::university::universities_from_values;
//!
//! let raw = serde_json::json!({"data": [/* university records */]});
//! let cards = universities_from_values(normalize(raw));
//! ```

pub mod article;
pub mod enquiry;
pub mod envelope;
pub mod filters;
pub mod home;
pub mod locator;
pub mod pagination;
pub mod program;
pub mod university;
