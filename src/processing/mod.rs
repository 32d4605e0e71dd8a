//! Resume extraction engine

pub mod analyzer;
pub mod classifier;
pub mod contact;
pub mod dates;
pub mod document;
pub mod education;
pub mod entities;
pub mod experience;
#[cfg(feature = "ner-model")]
pub mod ner_model;
pub mod parser;
pub mod reference;
pub mod relevance;
pub mod skills;

pub use analyzer::{AnalysisEngine, AnalysisResult};
pub use parser::{ParsedResume, ResumeParser};
