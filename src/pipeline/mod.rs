//! Pipeline stages for PDF-to-JSON extraction.
//!
//! Each submodule implements exactly one transformation step, so each is
//! independently testable and the upstream provider can be swapped without
//! touching the other stages.
//!
//! ## Data Flow
//!
//! ```text
//! text ──▶ llm ──▶ normalize
//! (lopdf)  (chat)   (fences + JSON parse)
//! ```
//!
//! 1. [`text`]: pull every page's text out of the PDF; runs in
//!    `spawn_blocking` because parsing is CPU-bound
//! 2. [`llm`]: one chat-completions call; the only stage with network I/O
//! 3. [`normalize`]: strip stray code fences and parse, falling back to an
//!    error envelope when the reply is not JSON

pub mod llm;
pub mod normalize;
pub mod text;
