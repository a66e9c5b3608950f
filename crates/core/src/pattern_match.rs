//! SQL LIKE pattern matching.
//!
//! Two wildcards are supported:
//! - `%` matches zero or more characters
//! - `_` matches exactly one character
//!
//! A backslash makes the following pattern character match literally.
//! Matching is case-sensitive and operates on Unicode scalar values.

/// Outcome of matching a pattern suffix against an input suffix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LikeResult {
    True,
    False,
    /// The input ran out while the pattern still needs literal characters.
    /// Any shorter suffix of the input cannot match either, so callers
    /// retrying later start positions stop immediately.
    Abort,
}

/// SQL LIKE pattern matching.
///
/// ```
/// use shoal_core::pattern_match::like;
/// assert!(like("hello", "h%o"));
/// assert!(like("hello", "_ello"));
/// assert!(like("a%b", "a\\%b"));
/// assert!(!like("hello", "world"));
/// ```
pub fn like(value: &str, pattern: &str) -> bool {
    let v: Vec<char> = value.chars().collect();
    let p: Vec<char> = pattern.chars().collect();
    like_internal(&v, &p) == LikeResult::True
}

/// Three-way LIKE over character slices.
pub fn like_internal(mut s: &[char], mut p: &[char]) -> LikeResult {
    if p == ['%'] {
        return LikeResult::True;
    }

    while !p.is_empty() && !s.is_empty() {
        match p[0] {
            '\\' => {
                p = &p[1..];
                if p.first() != Some(&s[0]) {
                    return LikeResult::False;
                }
            }
            '%' => {
                p = &p[1..];
                // Skip runs of wildcards, consuming one input char per `_`.
                while let Some(&c) = p.first() {
                    match c {
                        '%' => p = &p[1..],
                        '_' => {
                            if s.is_empty() {
                                return LikeResult::Abort;
                            }
                            p = &p[1..];
                            s = &s[1..];
                        }
                        _ => break,
                    }
                }
                if p.is_empty() {
                    return LikeResult::True;
                }

                let first = if p[0] == '\\' { p.get(1).copied() } else { Some(p[0]) };
                while !s.is_empty() {
                    if Some(s[0]) == first {
                        let matched = like_internal(s, p);
                        if matched != LikeResult::False {
                            return matched;
                        }
                    }
                    s = &s[1..];
                }
                return LikeResult::Abort;
            }
            '_' => {}
            c => {
                if c != s[0] {
                    return LikeResult::False;
                }
            }
        }
        p = &p[1..];
        s = &s[1..];
    }

    if !s.is_empty() {
        return LikeResult::False;
    }

    // Input exhausted: only `%` may remain.
    while p.first() == Some(&'%') {
        p = &p[1..];
    }
    if p.is_empty() {
        LikeResult::True
    } else {
        LikeResult::Abort
    }
}
