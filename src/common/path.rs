//! Lexical path weaving.
//!
//! Nothing here touches the filesystem. Both `/` and `\` act as separators when
//! splitting the base and consuming leading `.`/`..` segments of the relative part.
//! Only those ASCII bytes are inspected, so the byte forms accept any encoding.

use crate::common::types::PlatformStatus;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Woven {
    pub path: String,
    /// Set when a `..` segment found no directory left to pop in the base.
    pub base_exhausted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WovenBytes {
    pub path: Vec<u8>,
    pub base_exhausted: bool,
}

/// `base[..head_len]` followed by `relative[tail_start..]` is the woven path.
struct Split {
    head_len: usize,
    tail_start: usize,
    base_exhausted: bool,
}

fn is_separator(byte: u8) -> bool {
    byte == b'/' || byte == b'\\'
}

/// Index of the last separator at or before `end`, scanning backward.
fn separator_at_or_before(bytes: &[u8], end: usize) -> Option<usize> {
    bytes[..=end].iter().rposition(|b| is_separator(*b))
}

/// Length of a leading `.` or `..` segment of `rest`, including its separator.
///
/// A name that merely starts with dots (`.hidden`, `..x`, `...`) is not a segment.
/// Consumption stops before its first dot instead of after the dots, so the name
/// reaches the output whole and does not lose its leading periods.
fn dot_segment(rest: &[u8]) -> Option<(usize, bool)> {
    let periods = match rest {
        [b'.', b'.', ..] => 2,
        [b'.', ..] => 1,
        _ => return None,
    };
    match rest.get(periods) {
        None => Some((periods, periods == 2)),
        Some(b) if is_separator(*b) => Some((periods + 1, periods == 2)),
        Some(_) => None,
    }
}

fn split(base: Option<&[u8]>, relative: &[u8]) -> Split {
    const PASSTHROUGH: Split = Split {
        head_len: 0,
        tail_start: 0,
        base_exhausted: false,
    };

    let base = match base {
        Some(base) if !base.is_empty() => base,
        _ => return PASSTHROUGH,
    };

    // `keep` is the index of the separator closing the directory part.
    let Some(mut keep) = separator_at_or_before(base, base.len() - 1) else {
        return PASSTHROUGH;
    };
    let mut kept_any = true;
    let mut base_exhausted = false;

    let mut pos = 0;
    while let Some((consumed, ascend)) = dot_segment(&relative[pos..]) {
        pos += consumed;
        if !ascend {
            continue;
        }
        if !kept_any || keep == 0 {
            kept_any = false;
            base_exhausted = true;
            continue;
        }
        match separator_at_or_before(base, keep - 1) {
            Some(idx) => keep = idx,
            None => {
                kept_any = false;
                base_exhausted = true;
            }
        }
    }

    if base_exhausted {
        log::debug!(
            target: "platutils::path",
            "base \"{}\" has too few levels for \"{}\"",
            base.escape_ascii(),
            relative.escape_ascii()
        );
    }

    Split {
        head_len: if kept_any { keep + 1 } else { 0 },
        tail_start: pos,
        base_exhausted,
    }
}

pub fn weave_bytes(base: Option<&[u8]>, relative: &[u8]) -> WovenBytes {
    let cut = split(base, relative);
    let head = base.map_or(&[][..], |base| &base[..cut.head_len]);
    let base_len = base.map_or(0, <[u8]>::len);

    let mut path = Vec::with_capacity(base_len + relative.len() + 2);
    path.extend_from_slice(head);
    path.extend_from_slice(&relative[cut.tail_start..]);
    WovenBytes {
        path,
        base_exhausted: cut.base_exhausted,
    }
}

pub fn weave(base: Option<&str>, relative: &str) -> Woven {
    let cut = split(base.map(str::as_bytes), relative.as_bytes());
    // Both cut points sit just past an ASCII byte, so they are char boundaries.
    let head = base.map_or("", |base| &base[..cut.head_len]);
    let base_len = base.map_or(0, str::len);

    let mut path = String::with_capacity(base_len + relative.len() + 2);
    path.push_str(head);
    path.push_str(&relative[cut.tail_start..]);
    Woven {
        path,
        base_exhausted: cut.base_exhausted,
    }
}

pub fn weave_paths(base: Option<&str>, relative: &str) -> String {
    weave(base, relative).path
}

pub fn weave_paths_strict(base: Option<&str>, relative: &str) -> Result<String, PlatformStatus> {
    let woven = weave(base, relative);
    if woven.base_exhausted {
        return Err(PlatformStatus::BaseTooShallow);
    }
    Ok(woven.path)
}

/// Only a leading `/` marks a path as absolute; an empty path is never relative.
pub fn is_relative(path: &str) -> bool {
    is_relative_bytes(path.as_bytes())
}

pub fn is_relative_bytes(path: &[u8]) -> bool {
    !path.is_empty() && path[0] != b'/'
}
