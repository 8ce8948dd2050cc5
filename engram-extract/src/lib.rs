//! # engram-extract
//!
//! Pure field extraction over memory content. Fills whatever the caller
//! left blank: category (ordered keyword rules, first match wins), entity
//! (lexicon + identifier scan), confidence (certainty/hedge wording), and
//! normalized tags. Caller-supplied values always win.

mod confidence;
mod engine;
mod entity;
mod rules;
mod tags;

pub use engine::{Extraction, Extractor, ProvidedFields};
