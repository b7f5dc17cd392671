//! Grammar modules, one per supported language
//!
//! - `tolk` - the Tolk smart-contract language
//! - `tlb` - TL-B schemas
//! - `fift` - Fift assembler output
//!
//! Each module exposes a `source_file` entry point driven by the shared
//! [`Parser`](super::parser::Parser).

pub(crate) mod fift;
pub(crate) mod tlb;
pub(crate) mod tolk;
