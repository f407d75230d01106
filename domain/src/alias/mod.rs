//! Tool-name alias resolution
//!
//! Callers (users, config files, language models) spell tool names in many
//! ways: `bash`, `Run-Command`, `shell_exec`. [`AliasResolver`] maps every
//! spelling to one canonical name, or reports that nothing matched.
//!
//! Resolution order:
//!
//! 1. exact lookup of the lower-cased, trimmed input and its separator
//!    variants (`_` removed, `-` removed, `_`/`-` swapped)
//! 2. substring containment against registered aliases, first hit wins
//!
//! The containment fallback is permissive: a short alias such as `api`
//! matches any input containing it. [`AliasResolver::with_min_containment_len`]
//! bounds that when needed.

pub mod resolver;

pub use resolver::{AliasResolver, SIMILARITY_THRESHOLD};
