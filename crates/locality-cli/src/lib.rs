//! locality-cli
//! ============
//!
//! Command-line shell for the `locality-core` lookup engine.
//!
//! The binary (`locality-cli`) is the primary deliverable. This library
//! target holds the result rendering so it can be tested on its own.
//!
//! Basic usage:
//!
//! ```text
//! locality-cli --db localities.bin import localities.json.gz
//! locality-cli --db localities.bin rebuild
//! locality-cli --db localities.bin search "Smith Falls" --phonetic --threshold 0.5
//! locality-cli encode Robert Rupert
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod render;
