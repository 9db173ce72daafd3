//! Guard predicates applied before a request reaches the tail reader.
//! They never fail: callers turn `false` into a user-facing rejection.

pub const MAX_SEARCH_TERM_LEN: usize = 100;
pub const MIN_LIMIT: i64 = 1;
pub const MAX_LIMIT: i64 = 1000;

/// Rejects absolute names and any `..` path component.
/// The empty name is accepted; callers substitute a default upstream.
pub fn is_filename_valid(name: &str) -> bool {
    if name.starts_with('/') || name.starts_with('\\') {
        return false;
    }

    // C:\..., C:foo
    let bytes = name.as_bytes();
    if bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
        return false;
    }

    !name.split(['/', '\\']).any(|component| component == "..")
}

/// True when the name would reach outside the log directory's top level.
pub fn has_path_separator(name: &str) -> bool {
    name.contains(['/', '\\'])
}

pub fn is_search_term_valid(term: &str) -> bool {
    term.chars().count() <= MAX_SEARCH_TERM_LEN
}

pub fn is_limit_valid(limit: i64) -> bool {
    (MIN_LIMIT..=MAX_LIMIT).contains(&limit)
}
