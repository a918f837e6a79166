//! tagsift reads the metadata embedded in music files, primarily from ID3v2 tags.
//!
//! The [`id3v2`] module does most of the work, while [`id3v1`] covers the legacy tag that
//! some files carry at their end instead.

#![forbid(unsafe_code)]

mod core;
pub mod id3v1;
pub mod id3v2;
pub mod string;
