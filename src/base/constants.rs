//! Domain constants shared across the crate.

/// Extension of the high-level contract language.
pub const TOLK_EXT: &str = "tolk";
/// Extension of the binary-schema description language.
pub const TLB_EXT: &str = "tlb";
/// Extension of the stack-machine assembly language.
pub const FIFT_EXT: &str = "fif";

/// Directory name the standard library ships under.
pub const STDLIB_DIR: &str = "tolk-stdlib";
/// Environment variable overriding stdlib discovery.
pub const STDLIB_ENV: &str = "TOLK_STDLIB";
/// File implicitly imported by every contract file.
pub const COMMON_FILE: &str = "common.tolk";
/// Compiler built-ins that have no source in the stdlib.
pub const STUBS_FILE: &str = "stubs.tolk";
/// Import prefix that addresses the standard library.
pub const STDLIB_IMPORT_PREFIX: &str = "@stdlib/";

/// Identifier inserted at the cursor by completion requests.
pub const COMPLETION_PLACEHOLDER: &str = "DummyIdentifier";
