//! Identifier extraction and whole-word substitution on raw code text.
//!
//! Both functions work on code that may not parse: they only need to tell
//! names apart from numbers, comments, and keywords. A name is a maximal run
//! of `[A-Za-z0-9_]` starting with a letter or underscore and not preceded
//! by a word character, so the `e5` in `1e5` is not a name.

use std::collections::BTreeSet;

use rustc_hash::FxHashMap;

use crate::lexer::{KEYWORDS, is_ident_continue, is_ident_start};

/// A piece of code text, classified.
enum Segment<'a> {
    /// An identifier (keywords excluded).
    Name(&'a str),
    /// Anything else, copied through unchanged.
    Other(&'a str),
}

/// Split code into names and everything else.
fn segments(code: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let bytes = code.as_bytes();
    let mut other_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i] as char;
        if c == '#' {
            // Comment runs to the end of the line.
            while i < bytes.len() && bytes[i] != b'\n' {
                i += 1;
            }
            continue;
        }
        if is_ident_continue(c) {
            let start = i;
            while i < bytes.len() && is_ident_continue(bytes[i] as char) {
                i += 1;
            }
            let word = &code[start..i];
            if is_ident_start(c) && !KEYWORDS.contains(&word) {
                if other_start < start {
                    out.push(Segment::Other(&code[other_start..start]));
                }
                out.push(Segment::Name(word));
                other_start = i;
            }
            continue;
        }
        // Multi-byte characters are never part of a name.
        i += code[i..].chars().next().map_or(1, char::len_utf8);
    }

    if other_start < code.len() {
        out.push(Segment::Other(&code[other_start..]));
    }
    out
}

/// Return all identifiers used in the code, in sorted order.
///
/// Keywords (`and`, `or`, `not`, `True`, `False`), numeric literals, and
/// comments are ignored.
pub fn get_identifiers(code: &str) -> BTreeSet<String> {
    segments(code)
        .into_iter()
        .filter_map(|segment| match segment {
            Segment::Name(name) => Some(name.to_string()),
            Segment::Other(_) => None,
        })
        .collect()
}

/// Replace whole-word occurrences of names according to `substitutions`.
///
/// Only complete identifiers are replaced: substituting `v` leaves `v0`
/// and `dv` alone.
pub fn word_substitute(code: &str, substitutions: &FxHashMap<String, String>) -> String {
    if substitutions.is_empty() {
        return code.to_string();
    }
    let mut out = String::with_capacity(code.len());
    for segment in segments(code) {
        match segment {
            Segment::Name(name) => match substitutions.get(name) {
                Some(replacement) => out.push_str(replacement),
                None => out.push_str(name),
            },
            Segment::Other(text) => out.push_str(text),
        }
    }
    out
}
