//! Per-platform record extractors.
//!
//! Each submodule turns one rendered page snapshot into the set of article
//! records visible in it. Extractors are pure parsing code: they take markup
//! and a base URL, never touch the network, and can be re-run on the same
//! snapshot with identical results, which is what makes them safe to call
//! once per scroll cycle against a fully re-rendered DOM.
//!
//! # Supported Platforms
//!
//! | Platform | Module | Marker |
//! |----------|--------|--------|
//! | Medium | [`medium`] | `meta[content="com.medium.reader"]` |

pub mod medium;
