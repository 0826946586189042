//! Intermediate Representation of report content.
//!
//! Rendering is a two-stage pipeline: [`markup`] normalizes the editor's
//! restricted HTML dialect into a non-printable marker stream, and [`blocks`]
//! parses that stream into the typed block sequence in [`nodes`]. Both format
//! backends consume the same IR; neither ever sees raw markup.

pub mod blocks;
pub mod markup;
pub mod nodes;

pub use nodes::{Block, Document, ListItem, Run, Section, SectionInput};

/// Parse one section's raw markup into blocks.
pub fn parse_content(raw: &str) -> Vec<Block> {
    blocks::parse_blocks(&markup::normalize(raw))
}
