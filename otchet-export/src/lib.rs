//! Dual-format export of GOST 7.32-2017 research reports
//!
//!     This crate turns the section contents of a research report (stored by the
//!     editor in a restricted HTML dialect) into finished DOCX and PDF files that
//!     follow the GOST 7.32-2017 formatting rules.
//!
//!     TLDR for backend authors:
//!         - Backends never see raw markup. Content goes through the IR first:
//!           markup normalization (./ir/markup.rs) then block parsing (./ir/blocks.rs).
//!         - All formatting constants come from the style profile (./style.rs).
//!           A backend that hardcodes a margin or a font size is a bug.
//!         - Section walking (order, empty-section skipping, injected headings)
//!           lives in ./render.rs and is shared; a backend only implements the
//!           RenderBackend sink.
//!         - A backend renders to bytes in memory. File placement and atomic
//!           writes belong to the export pipeline (./export.rs), never to backends.
//!
//! Architecture
//!
//!     The goal is to keep everything the two output formats agree on in a
//!     format-agnostic layer. That layer is the IR (./ir/) plus the shared
//!     document walker (./render.rs): parsing decisions and section semantics are
//!     made exactly once, and each backend receives the same block stream. The
//!     format specific code is then focused on its own emission concerns:
//!     WordprocessingML and OPC packaging for DOCX, line layout and font
//!     embedding for PDF.
//!
//!     This is a pure lib: it powers the otchet CLI but is shell agnostic, no
//!     code here prints to std streams or assumes a terminal. The single
//!     exception is the PDF font search honoring OTCHET_FONT_DIR, which exists
//!     so deployments can point at their font files without code changes.
//!
//!     The file structure:
//!     .
//!     ├── error.rs
//!     ├── style.rs                # The GOST style profile, single source of constants
//!     ├── templates.rs            # Built-in section catalog (codes, names, order)
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry for discovery and selection
//!     ├── render.rs               # Shared document walker + RenderBackend trait
//!     ├── export.rs               # In-memory render, then atomic file placement
//!     ├── ir
//!     │   ├── markup.rs           # Restricted HTML dialect → marker stream
//!     │   ├── blocks.rs           # Marker stream → typed blocks
//!     │   └── nodes.rs            # Run / Block / Section / Document
//!     └── formats
//!         ├── docx                # WordprocessingML + OPC zip packaging
//!         └── pdf                 # Layout engine + printpdf emission
//!
//! The two backends
//!
//!     DOCX is the editable output. It delegates everything dynamic to the
//!     consuming word processor: the table of contents and page numbers are
//!     fields, headings carry outline levels, pagination is the consumer's.
//!
//!     PDF is the fixed output. It cannot delegate anything, so it does its own
//!     line breaking, justification and pagination over embedded TTF fonts. The
//!     two backends are intentionally independent renderings of the same IR;
//!     their contract is visual equivalence of content, not byte-level parity,
//!     and the PDF deliberately has no TOC or page numbers.
//!
//! Degradation policy
//!
//!     Content parsing never fails. Unknown tags are dropped silently, unmatched
//!     markup closes at the paragraph boundary, and the worst case for
//!     pathological input is a plain paragraph of marker-stripped text. Errors
//!     are reserved for things the caller must hear about: unknown section
//!     codes, unknown formats, backend failures, filesystem failures.

pub mod error;
pub mod export;
pub mod format;
pub mod formats;
pub mod ir;
pub mod registry;
pub mod render;
pub mod style;
pub mod templates;

pub use error::ExportError;
pub use export::{export_document, ExportedFile};
pub use format::Format;
pub use ir::{Document, SectionInput};
pub use registry::FormatRegistry;
pub use style::GostProfile;
