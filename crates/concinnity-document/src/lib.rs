//! Document shell and style assembly for server-rendered pages.
//!
//! This crate turns a rendered page into the HTML document sent to the
//! browser:
//! - `HeadContent` - Ordered head elements
//! - `DocumentShell` - Static shell markup and the theme collaborator
//! - `DocumentAssembler` - Merges critical style fragments into the document
//! - `AssembledDocument` - Final head, styles, body and scripts
//! - `DocumentSink` - Writes a document head-first over any byte sink

mod assembler;
mod document;
mod head;
mod shell;
mod sink;
mod theme;

pub use assembler::*;
pub use document::*;
pub use head::*;
pub use shell::*;
pub use sink::*;
pub use theme::*;
