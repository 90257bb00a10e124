//! Notes and annotations for SBML documents converted from Reactome
//! pathway records.
//!
//! The core flattens nested complexes into counted member lists and
//! sanitizes curator free text so it can be embedded in XHTML notes.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
