//! Compiled-in registry of index setting keys.
//!
//! Every configurable key is either static (fixed when the index is created)
//! or dynamic (updatable on a live index). The two lists are disjoint.

/// Whether a setting can change on a live index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKind {
    /// Only settable at creation. A change requires recreating the index.
    Static,
    /// Updatable in place through the settings API.
    Dynamic,
}

const STATIC_KEYS: &[&str] = &[
    "number_of_shards",
    "number_of_routing_shards",
    "codec",
    "routing_partition_size",
    "load_fixed_bitset_filters_eagerly",
    "shard.check_on_startup",
    "sort.field",
    "sort.order",
    "mapping.coerce",
];

const DYNAMIC_KEYS: &[&str] = &[
    "number_of_replicas",
    "auto_expand_replicas",
    "refresh_interval",
    "search.idle.after",
    "max_result_window",
    "max_inner_result_window",
    "max_rescore_window",
    "max_docvalue_fields_search",
    "max_script_fields",
    "max_ngram_diff",
    "max_shingle_diff",
    "max_refresh_listeners",
    "analyze.max_token_count",
    "highlight.max_analyzed_offset",
    "max_terms_count",
    "max_regex_length",
    "query.default_field",
    "routing.allocation.enable",
    "routing.rebalance.enable",
    "gc_deletes",
    "blocks.read_only",
    "blocks.read_only_allow_delete",
    "blocks.read",
    "blocks.write",
    "blocks.metadata",
    "default_pipeline",
    "final_pipeline",
    "unassigned.node_left.delayed_timeout",
    "hidden",
    "mapping.total_fields.limit",
    "mapping.total_fields.ignore_dynamic_beyond_limit",
    "mapping.depth.limit",
    "mapping.nested_fields.limit",
    "mapping.nested_objects.limit",
    "mapping.field_name_length.limit",
    "search.slowlog.threshold.query.warn",
    "search.slowlog.threshold.query.info",
    "search.slowlog.threshold.query.debug",
    "search.slowlog.threshold.query.trace",
    "search.slowlog.threshold.fetch.warn",
    "search.slowlog.threshold.fetch.info",
    "search.slowlog.threshold.fetch.debug",
    "search.slowlog.threshold.fetch.trace",
    "search.slowlog.level",
    "indexing.slowlog.threshold.index.warn",
    "indexing.slowlog.threshold.index.info",
    "indexing.slowlog.threshold.index.debug",
    "indexing.slowlog.threshold.index.trace",
    "indexing.slowlog.level",
    "indexing.slowlog.source",
];

/// Looks up the kind of a setting key. Accepts an optional `index.` prefix.
#[must_use]
pub fn setting_kind(key: &str) -> Option<SettingKind> {
    let key = key.strip_prefix("index.").unwrap_or(key);
    if STATIC_KEYS.contains(&key) {
        Some(SettingKind::Static)
    } else if DYNAMIC_KEYS.contains(&key) {
        Some(SettingKind::Dynamic)
    } else {
        None
    }
}

/// Keys fixed at creation time.
pub fn static_keys() -> impl Iterator<Item = &'static str> {
    STATIC_KEYS.iter().copied()
}

/// Keys updatable on a live index.
pub fn dynamic_keys() -> impl Iterator<Item = &'static str> {
    DYNAMIC_KEYS.iter().copied()
}

#[must_use]
pub fn is_dynamic(key: &str) -> bool {
    setting_kind(key) == Some(SettingKind::Dynamic)
}

#[must_use]
pub fn is_static(key: &str) -> bool {
    setting_kind(key) == Some(SettingKind::Static)
}
