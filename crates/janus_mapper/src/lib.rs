//! janus_mapper: cross-language AST mapping.
//!
//! Each direction consumes a source AST and builds a fresh target AST in
//! its own arena. Mapping is total: constructs the target language cannot
//! express either pass through conservatively (operator kinds the target
//! printer can still spell) or become a comment-marker node with a
//! diagnostic. Every mapped node keeps the source node's line. Precedence
//! is never consulted; it is implied by tree shape.

mod cs_to_js;
mod js_to_cs;

pub use cs_to_js::CsToJs;
pub use js_to_cs::JsToCs;
