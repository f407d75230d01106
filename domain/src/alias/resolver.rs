//! Alias resolution for tool names.

use std::collections::{BTreeSet, HashMap, HashSet};

/// Minimum character-overlap score for a canonical name to be suggested
pub const SIMILARITY_THRESHOLD: f64 = 0.3;

/// Many-to-one map from tool-name spellings to canonical names.
///
/// Built once through the `register_*` methods, then shared read-only
/// (typically behind an `Arc`). Every canonical name is registered as its
/// own alias, so [`normalize`](Self::normalize) is idempotent.
///
/// # Example
///
/// ```
/// use relay_domain::AliasResolver;
///
/// let mut resolver = AliasResolver::new();
/// resolver.register_alias("run_command", "execute_shell");
///
/// assert_eq!(resolver.normalize("Run-Command"), Some("execute_shell"));
/// assert_eq!(resolver.normalize("execute_shell"), Some("execute_shell"));
/// assert_eq!(resolver.normalize("translator"), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct AliasResolver {
    /// alias (lower-cased) → canonical name
    table: HashMap<String, String>,
    /// aliases in registration order, scanned by the containment fallback
    order: Vec<String>,
    /// canonical names in registration order
    canonical: Vec<String>,
    /// shorter side of a containment match must have at least this many chars
    min_containment_len: usize,
}

fn clean(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Lookup variants: original, underscores removed, hyphens removed,
/// underscores and hyphens swapped.
fn separator_variants(key: &str) -> Vec<String> {
    let swapped: String = key
        .chars()
        .map(|c| match c {
            '_' => '-',
            '-' => '_',
            other => other,
        })
        .collect();
    let mut variants = vec![
        key.to_string(),
        key.replace('_', ""),
        key.replace('-', ""),
        swapped,
    ];
    variants.dedup();
    variants
}

fn jaccard(a: &str, b: &str) -> f64 {
    let a: HashSet<char> = a.chars().collect();
    let b: HashSet<char> = b.chars().collect();
    let union = a.union(&b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(&b).count() as f64 / union as f64
}

impl AliasResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require the shorter side of a substring-containment match to be at
    /// least `len` characters long (0 keeps containment unrestricted)
    pub fn with_min_containment_len(mut self, len: usize) -> Self {
        self.min_containment_len = len;
        self
    }

    pub fn min_containment_len(&self) -> usize {
        self.min_containment_len
    }

    /// Register a canonical name with its identity mapping.
    ///
    /// Returns `false` if the name is blank or already canonical.
    pub fn register_tool(&mut self, canonical: &str) -> bool {
        let canonical = clean(canonical);
        if canonical.is_empty() || self.is_canonical(&canonical) {
            return false;
        }
        self.insert(canonical.clone(), canonical.clone());
        self.canonical.push(canonical);
        true
    }

    /// Map `alias` to `canonical`, registering the canonical name if needed.
    ///
    /// A canonical name's identity mapping cannot be redirected; such
    /// registrations return `false`. Re-registering an alias moves it to the
    /// new target.
    pub fn register_alias(&mut self, alias: &str, canonical: &str) -> bool {
        let alias = clean(alias);
        let target = clean(canonical);
        if alias.is_empty() || target.is_empty() {
            return false;
        }
        if self.is_canonical(&alias) && alias != target {
            return false;
        }
        self.register_tool(&target);
        self.insert(alias, target);
        true
    }

    pub fn register_aliases<'a>(&mut self, pairs: impl IntoIterator<Item = (&'a str, &'a str)>) {
        for (alias, canonical) in pairs {
            self.register_alias(alias, canonical);
        }
    }

    fn insert(&mut self, alias: String, canonical: String) {
        if self.table.insert(alias.clone(), canonical).is_none() {
            self.order.push(alias);
        }
    }

    pub fn is_canonical(&self, name: &str) -> bool {
        self.canonical.iter().any(|c| c == name)
    }

    /// Canonical names in registration order
    pub fn canonical_names(&self) -> &[String] {
        &self.canonical
    }

    /// All registered `(alias, canonical)` pairs in registration order,
    /// identity mappings included
    pub fn aliases(&self) -> impl Iterator<Item = (&str, &str)> {
        self.order
            .iter()
            .filter_map(|alias| self.table.get(alias).map(|c| (alias.as_str(), c.as_str())))
    }

    /// Resolve any spelling of a tool name to its canonical name.
    ///
    /// Exact lookup over separator variants first, then the first alias (in
    /// registration order) that contains the input or is contained in it.
    pub fn normalize(&self, raw: &str) -> Option<&str> {
        let key = clean(raw);
        if key.is_empty() {
            return None;
        }

        for variant in separator_variants(&key) {
            if let Some(canonical) = self.table.get(&variant) {
                return Some(canonical.as_str());
            }
        }

        self.order
            .iter()
            .find(|alias| self.contains_either(alias, &key))
            .and_then(|alias| self.table.get(alias))
            .map(String::as_str)
    }

    fn contains_either(&self, alias: &str, key: &str) -> bool {
        let shorter = alias.chars().count().min(key.chars().count());
        shorter >= self.min_containment_len && (alias.contains(key) || key.contains(alias))
    }

    /// Every alias of a canonical name, itself included, sorted
    pub fn aliases_for(&self, canonical: &str) -> Vec<String> {
        let canonical = clean(canonical);
        let set: BTreeSet<&String> = self
            .table
            .iter()
            .filter(|(_, target)| **target == canonical)
            .map(|(alias, _)| alias)
            .collect();
        set.into_iter().cloned().collect()
    }

    /// Canonical names the caller may have meant.
    ///
    /// Canonical names with an alias in a containment relation to the input
    /// come first, then the rest by character-set overlap (at least
    /// [`SIMILARITY_THRESHOLD`]), best first. Ties keep registration order.
    pub fn suggest(&self, raw: &str, max_n: usize) -> Vec<String> {
        let key = clean(raw);
        if key.is_empty() || max_n == 0 {
            return Vec::new();
        }

        let mut suggestions: Vec<String> = self
            .canonical
            .iter()
            .filter(|canonical| {
                self.aliases()
                    .any(|(alias, target)| target == canonical.as_str() && self.contains_either(alias, &key))
            })
            .cloned()
            .collect();

        let mut scored: Vec<(f64, &String)> = self
            .canonical
            .iter()
            .filter(|canonical| !suggestions.contains(*canonical))
            .map(|canonical| (jaccard(&key, canonical), canonical))
            .filter(|(score, _)| *score >= SIMILARITY_THRESHOLD)
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));

        suggestions.extend(scored.into_iter().map(|(_, canonical)| canonical.clone()));
        suggestions.truncate(max_n);
        suggestions
    }
}
