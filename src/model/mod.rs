//! Document model types for structured right-to-left text.
//!
//! This module defines the intermediate representation that bridges
//! parsing and rendering. A [`DocumentModel`] is built once per input
//! string and is the only thing the layout engine and the renderers see.

mod builder;
mod contact;
mod document;

pub use builder::{build, DocumentBuilder};
pub use contact::{Contact, ContactField, ContactKind, PLACEHOLDER};
pub use document::{
    ContactSection, DocumentModel, LabelValue, ListItem, ListMarker, Section, SectionItem,
};
