//! Entity-tag precondition evaluation (RFC 7232 `If-None-Match` / `If-Match`).
//!
//! Pure functions over header values and the current [`VersionToken`]; the
//! caller decides how to turn a disposition into a response.

use crate::version::VersionToken;

/// Outcome of evaluating `If-None-Match` on a read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadDisposition {
    /// Send the full representation with cache headers.
    Fresh,
    /// Send 304 with an empty body; the client's copy is current.
    NotModified,
}

/// Outcome of evaluating `If-Match` before a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteDisposition {
    Proceed,
    /// The client's version is stale; nothing may be written.
    AbortConflict,
}

/// One member of an entity-tag list header.
#[derive(Debug, Clone, PartialEq, Eq)]
enum TagMatcher<'a> {
    Any,
    Tag { weak: bool, opaque: &'a str },
}

/// Split an entity-tag list into its members.
///
/// `opaque` keeps the surrounding quotes so it compares directly against a
/// [`VersionToken`]. Parsing stops at the first malformed member; anything
/// before it is still honoured.
fn parse_tag_list(header: &str) -> Vec<TagMatcher<'_>> {
    let mut matchers = Vec::new();
    let mut rest = header;

    loop {
        rest = rest.trim_start_matches(|c: char| c == ',' || c.is_ascii_whitespace());
        if rest.is_empty() {
            break;
        }

        if let Some(after) = rest.strip_prefix('*') {
            matchers.push(TagMatcher::Any);
            rest = after;
            continue;
        }

        let (weak, quoted) = match rest.strip_prefix("W/") {
            Some(after) => (true, after),
            None => (false, rest),
        };

        if !quoted.starts_with('"') {
            break;
        }
        match quoted[1..].find('"') {
            Some(close) => {
                let end = close + 2;
                matchers.push(TagMatcher::Tag {
                    weak,
                    opaque: &quoted[..end],
                });
                rest = &quoted[end..];
            }
            None => break,
        }
    }

    matchers
}

/// Decide whether a conditional GET can be answered with 304.
///
/// Uses weak comparison: a `W/` prefix on the client's tag is ignored.
pub fn evaluate_read(if_none_match: Option<&str>, current: &VersionToken) -> ReadDisposition {
    let Some(header) = if_none_match else {
        return ReadDisposition::Fresh;
    };

    let matched = parse_tag_list(header).iter().any(|m| match m {
        TagMatcher::Any => true,
        TagMatcher::Tag { opaque, .. } => *opaque == current.as_str(),
    });

    if matched {
        ReadDisposition::NotModified
    } else {
        ReadDisposition::Fresh
    }
}

/// Decide whether a write may go ahead.
///
/// A missing header proceeds. Uses strong comparison: weak tags never match.
pub fn evaluate_precondition(if_match: Option<&str>, current: &VersionToken) -> WriteDisposition {
    let Some(header) = if_match else {
        return WriteDisposition::Proceed;
    };

    let matched = parse_tag_list(header).iter().any(|m| match m {
        TagMatcher::Any => true,
        TagMatcher::Tag { weak, opaque } => !*weak && *opaque == current.as_str(),
    });

    if matched {
        WriteDisposition::Proceed
    } else {
        WriteDisposition::AbortConflict
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn token(secs: i64) -> VersionToken {
        VersionToken::from_timestamp(Utc.timestamp_opt(secs, 0).unwrap())
    }

    // -- parse_tag_list ------------------------------------------------------

    #[test]
    fn parses_list_with_weak_and_wildcard() {
        let parsed = parse_tag_list(r#""1", W/"2" , *"#);
        assert_eq!(
            parsed,
            vec![
                TagMatcher::Tag {
                    weak: false,
                    opaque: "\"1\"",
                },
                TagMatcher::Tag {
                    weak: true,
                    opaque: "\"2\"",
                },
                TagMatcher::Any,
            ]
        );
    }

    #[test]
    fn stops_at_malformed_member() {
        let parsed = parse_tag_list(r#""1", bogus, "2""#);
        assert_eq!(
            parsed,
            vec![TagMatcher::Tag {
                weak: false,
                opaque: "\"1\"",
            }]
        );
        assert!(parse_tag_list("\"unterminated").is_empty());
    }

    // -- evaluate_read -------------------------------------------------------

    #[test]
    fn read_without_header_is_fresh() {
        assert_eq!(evaluate_read(None, &token(1_737_820_800)), ReadDisposition::Fresh);
    }

    #[test]
    fn read_with_matching_tag_is_not_modified() {
        assert_eq!(
            evaluate_read(Some("\"1737820800\""), &token(1_737_820_800)),
            ReadDisposition::NotModified
        );
    }

    #[test]
    fn read_with_stale_tag_is_fresh() {
        assert_eq!(
            evaluate_read(Some("\"0\""), &token(1_737_820_800)),
            ReadDisposition::Fresh
        );
    }

    #[test]
    fn read_requires_quotes() {
        assert_eq!(
            evaluate_read(Some("1737820800"), &token(1_737_820_800)),
            ReadDisposition::Fresh
        );
    }

    #[test]
    fn read_matches_any_member_and_weak_tags() {
        let current = token(1_737_820_800);
        assert_eq!(
            evaluate_read(Some(r#""1", "1737820800""#), &current),
            ReadDisposition::NotModified
        );
        assert_eq!(
            evaluate_read(Some(r#"W/"1737820800""#), &current),
            ReadDisposition::NotModified
        );
        assert_eq!(evaluate_read(Some("*"), &current), ReadDisposition::NotModified);
    }

    // -- evaluate_precondition -----------------------------------------------

    #[test]
    fn write_without_header_proceeds() {
        assert_eq!(
            evaluate_precondition(None, &token(1_737_820_800)),
            WriteDisposition::Proceed
        );
    }

    #[test]
    fn write_with_matching_tag_proceeds() {
        assert_eq!(
            evaluate_precondition(Some("\"1737820800\""), &token(1_737_820_800)),
            WriteDisposition::Proceed
        );
    }

    #[test]
    fn write_with_stale_tag_aborts() {
        assert_eq!(
            evaluate_precondition(Some("\"1737820799\""), &token(1_737_820_800)),
            WriteDisposition::AbortConflict
        );
    }

    #[test]
    fn write_rejects_weak_tags() {
        assert_eq!(
            evaluate_precondition(Some(r#"W/"1737820800""#), &token(1_737_820_800)),
            WriteDisposition::AbortConflict
        );
    }

    #[test]
    fn write_with_wildcard_proceeds() {
        assert_eq!(
            evaluate_precondition(Some("*"), &token(1_737_820_800)),
            WriteDisposition::Proceed
        );
    }

    #[test]
    fn write_with_garbage_aborts() {
        assert_eq!(
            evaluate_precondition(Some("not-a-tag"), &token(1_737_820_800)),
            WriteDisposition::AbortConflict
        );
    }
}
