//! The tag mini-language: descriptor type and parser.
//!
//! Tags are compact string directives attached to zones:
//!
//! ```text
//! #name[!][@group[!]][$data]
//!      ^ affect agents outside the zone instead of inside
//!          ^ restrict the effect to agents holding this role
//!                ^ treat the role filter as a blacklist instead
//!                      ^ free-form payload for the handler
//! ```
//!
//! Examples: `#nodamagedeal@admin!` (only non-admins lose the ability
//! to deal damage), `#globalvc!` (everyone outside the zone), and
//! `#role$shopper` (agents inside gain the `shopper` role).
//!
//! The grammar is deliberately tolerant: markers in positions that
//! would produce an empty token (doubled markers, a marker at the end
//! of the string, a marker directly before another marker) are skipped
//! silently rather than rejected. This matches long-standing authored
//! zone data in the wild and is pinned by tests; see
//! [`parse_tag`] for the exact rules.

use std::fmt;

/// The parsed, structured form of a tag string.
///
/// Produced by [`parse_tag`]. Equality compares the parsed fields only,
/// never the raw text, so `#a@b` and `a@b` compare equal.
#[derive(Clone, Debug, Default)]
pub struct TagDescriptor {
    /// Tag name, selects the handler. Empty means the tag is invalid
    /// and must be dropped by the caller.
    pub name: String,
    /// Optional role filter (the `@group` token).
    pub group: Option<String>,
    /// Affect agents outside the zone instead of inside.
    pub zone_inverted: bool,
    /// Treat the role filter as a blacklist instead of a whitelist.
    pub group_inverted: bool,
    /// Optional free-form payload (everything after `$`).
    pub data: Option<String>,
    /// Original text the descriptor was parsed from.
    pub raw: String,
}

impl TagDescriptor {
    /// Whether the descriptor names a tag at all.
    ///
    /// Parsing never fails; an input with no extractable name yields a
    /// descriptor with an empty name instead. Callers drop such
    /// descriptors with a warning.
    pub fn is_valid(&self) -> bool {
        !self.name.is_empty()
    }
}

impl PartialEq for TagDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.group == other.group
            && self.zone_inverted == other.zone_inverted
            && self.group_inverted == other.group_inverted
            && self.data == other.data
    }
}

impl Eq for TagDescriptor {}

impl fmt::Display for TagDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag: {}", self.name)?;
        if self.zone_inverted {
            write!(f, " (inverted)")?;
        }
        if let Some(group) = &self.group {
            write!(f, ", Group: {group}")?;
            if self.group_inverted {
                write!(f, " (inverted)")?;
            }
        }
        if let Some(data) = &self.data {
            write!(f, ", Data: {data}")?;
        }
        Ok(())
    }
}

/// Parse a tag string into a [`TagDescriptor`].
///
/// The scan walks the byte sequence once with explicit offsets. All
/// three markers are ASCII, so slicing at marker positions always lands
/// on UTF-8 boundaries and multi-byte name/group/data content passes
/// through untouched.
///
/// Rules, in the order the scan applies them:
///
/// - A leading `#` is skipped; the name starts after it.
/// - A marker sitting exactly where the name starts is absorbed into
///   the name rather than processed (`#!abc` parses as the name `!abc`).
/// - The first processed marker ends the name. `!` there sets
///   [`zone_inverted`](TagDescriptor::zone_inverted); `@` opens the
///   group token unless it would be empty; `$` opens the data token
///   unless it would be empty.
/// - After `!`, an immediately following `@` or `$` opens the group or
///   data token directly.
/// - The group token ends at the next processed `!` or `$`. A `!`
///   there sets [`group_inverted`](TagDescriptor::group_inverted) only
///   when it is last or directly followed by `$`. A later `@` does not
///   end the group, so `#t@a@b` yields the group `a@b`.
/// - The data token always runs to the end of the string; markers
///   inside it are payload.
/// - Markers that would open an empty token are skipped silently.
///
/// Never fails and never panics; malformed input degrades to a
/// descriptor with fewer populated fields, possibly an empty name.
pub fn parse_tag(raw: &str) -> TagDescriptor {
    let bytes = raw.as_bytes();
    let len = bytes.len();

    let mut name_start = 0usize;
    // Exclusive token ends; None = not yet terminated.
    let mut name_end: Option<usize> = None;
    let mut group_start: Option<usize> = None;
    let mut group_end: Option<usize> = None;
    let mut data_start: Option<usize> = None;
    let mut zone_inverted = false;
    let mut group_inverted = false;

    let mut i = 0usize;
    while i < len {
        let c = bytes[i];
        if i == 0 && c == b'#' {
            name_start = 1;
            i += 1;
            continue;
        }
        if c != b'!' && c != b'@' && c != b'$' {
            i += 1;
            continue;
        }
        // Marker at the very start of the name region is part of the name.
        if i == name_start {
            i += 1;
            continue;
        }
        let next = if i + 1 < len { Some(bytes[i + 1]) } else { None };
        let is_last = i + 1 == len;

        if name_end.is_none() {
            name_end = Some(i);
            match c {
                b'!' => {
                    // No group can exist yet; this is the zone inversion.
                    zone_inverted = true;
                    match next {
                        Some(b'@') => {
                            group_start = Some(i + 2);
                            i += 1;
                        }
                        Some(b'$') => {
                            data_start = Some(i + 2);
                            i += 1;
                        }
                        _ => {}
                    }
                }
                b'@' => {
                    if !is_last && !matches!(next, Some(b'@') | Some(b'$') | Some(b' ')) {
                        group_start = Some(i + 1);
                    }
                }
                b'$' => {
                    if !is_last && !matches!(next, Some(b'@') | Some(b'$') | Some(b' ')) {
                        data_start = Some(i + 1);
                    }
                }
                _ => {}
            }
        } else if group_start.is_some() && group_end.is_none() && c != b'@' {
            group_end = Some(i);
            match c {
                b'!' => {
                    if is_last || next == Some(b'$') {
                        group_inverted = true;
                    }
                    match next {
                        Some(b'@') => {
                            // The group restarts after `!@`.
                            group_start = Some(i + 2);
                            group_end = None;
                            i += 1;
                        }
                        Some(b'$') => {
                            data_start = Some(i + 2);
                            i += 1;
                        }
                        _ => {}
                    }
                }
                b'$' => {
                    if !is_last && !matches!(next, Some(b'@') | Some(b'$') | Some(b' ')) {
                        data_start = Some(i + 1);
                    }
                }
                _ => {}
            }
        }
        i += 1;
    }

    let name = raw[name_start..name_end.unwrap_or(len)].to_string();
    let group = group_start.map(|s| {
        let e = group_end.unwrap_or(len).max(s);
        raw[s..e].to_string()
    });
    let data = data_start.map(|s| raw[s..len].to_string());

    TagDescriptor {
        name,
        group,
        zone_inverted,
        group_inverted,
        data,
        raw: raw.to_string(),
    }
}
