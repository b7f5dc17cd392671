//! Semantic model: PSI, name resolution, types and usages.
//!
//! Everything here hangs off a [`Workspace`], the session registry that owns
//! the parsed files, one [`GlobalIndex`] per language and the memo caches.
//!
//! ## Key Types
//!
//! - [`NamedNode`] — a syntax node paired with the file it lives in
//! - [`DeclKind`] — declaration tag shared by all languages
//! - [`ResolveState`] — persistent key/value context of a resolve request
//! - [`Ty`] — the Tolk type algebra
//! - [`Resolver`] — usage → declarations, through a [`LanguageBinding`]
//! - [`Referent`] — declaration → usages
//! - [`TypeInferer`] — node → type
//!
//! ## Layers
//!
//! ```text
//! FileText (salsa input)
//!     │
//!     ▼
//! parse_file(file)          ← memoized per text
//!     │
//!     ▼
//! Workspace                 ← ParsedFile registry, import graph
//!     │
//!     ▼
//! GlobalIndex               ← per-language declaration index
//!     │
//!     ▼
//! Resolver / TypeInferer    ← cached in CacheManager
//!     │
//!     ▼
//! Referent                  ← usage search over a SearchScope
//! ```

mod cache;
mod db;
mod imports;
mod index;
mod infer;
pub mod method_id;
mod psi;
mod referent;
mod resolve;
mod state;
mod ty;
mod workspace;

pub use cache::CacheManager;
pub use db::{FileText, ParseResult, RootDatabase, file_imports, parse_file};
pub use imports::{ImportResolver, is_stdlib_import, normalize, relative_import};
pub use index::{FileIndex, GlobalIndex, IndexRoot};
pub use infer::TypeInferer;
pub use psi::{DeclKind, NamedNode, NodeKey, is_receiver_type_param};
pub use referent::{FindReferenceOptions, Referent, SearchScope};
pub use resolve::{
    FiftBinding, LanguageBinding, NameProcessor, Resolver, ScopeProcessor, TlbBinding,
    TolkBinding, Variant, binding, is_receiver_generic, resolve_by_name,
};
pub use state::{COMPLETION, DOT_QUALIFIER, NEED_PREFIX, ResolveState, SEARCH_NAME};
pub use ty::{BUILTIN_TYPES, Ty, TyMapping, is_builtin_type_name, name_to_type, sized_family_name};
pub use workspace::Workspace;
