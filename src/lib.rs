//! Core library for the glossary-tools command line application.
//!
//! The library exposes high-level orchestration helpers that power the
//! command-line interface as well as the integration tests. The modules are
//! structured to keep responsibilities narrow and composable: spreadsheet
//! adapters live under [`glossary::io`], data representations inside
//! [`glossary::model`], the row-to-term normalization in
//! [`glossary::normalize`], the derived document builders in
//! [`glossary::documents`] and [`glossary::quiz`], and the export
//! orchestration under [`glossary::sync`].

pub mod glossary;

pub use glossary::{Result, ToolError, documents, error, io, model, normalize, quiz, sync};
