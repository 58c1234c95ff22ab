//! Parsing of the LLM's reply into a migration and a compact document.
//!
//! The reply is free-form text. Two marker lines split it into sections:
//!
//! ~~~text
//! ### MIGRATION_CONTENT
//! ```yaml
//! ...
//! ```
//!
//! ### COMPACT_CONTENT
//! ...
//! ~~~
//!
//! Markers may come in either order and may be decorated as headings, bold
//! text, or inline code. A marker may carry a parenthetical (`(YAML)`) and a
//! colon; text after the colon starts the section body. A marker only counts
//! at the start of a line, so prose that merely mentions one is ignored.
//!
//! A section that opens with a code fence is delimited by that fence; fences
//! with a language tag nested inside it are paired off first. Otherwise the
//! text up to the next marker is used.

use super::ids::extract_issue_ids;
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

pub const MIGRATION_MARKER: &str = "MIGRATION_CONTENT";
pub const COMPACT_MARKER: &str = "COMPACT_CONTENT";

const MIN_FENCE_LEN: usize = 3;

/// Decorations an LLM puts around a marker: bold, italics, inline code.
const MARKER_WRAPPERS: &[char] = &['*', '_', '`'];

/// Emphasis that may follow a marker's colon. Backticks are left alone so a
/// fence opened on the marker line survives.
const EMPHASIS: &[char] = &['*', '_'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Migration,
    Compact,
}

impl Section {
    const ALL: [Section; 2] = [Section::Migration, Section::Compact];

    #[must_use]
    pub fn marker(self) -> &'static str {
        match self {
            Section::Migration => MIGRATION_MARKER,
            Section::Compact => COMPACT_MARKER,
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Could not find MIGRATION_CONTENT or COMPACT_CONTENT sections in the response")]
    NoSections,
    #[error("Response has no {0} section; both MIGRATION_CONTENT and COMPACT_CONTENT are required")]
    MissingSection(Section),
    #[error("The {0} section is empty")]
    EmptySection(Section),
    #[error("The {0} section opens a code fence that is never closed")]
    UnclosedFence(Section),
}

/// Migration text plus the identifiers it mentions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMigration {
    pub raw_content: String,
    pub issue_ids: BTreeSet<String>,
}

/// Full replacement text for the compact document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCompact {
    pub raw_content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedResponse {
    pub migration: ParsedMigration,
    pub compact: ParsedCompact,
}

/// A line of the reply with its byte span (including the line terminator).
#[derive(Debug, Clone, Copy)]
struct Line<'text> {
    start: usize,
    end: usize,
    text: &'text str,
}

fn index_lines(text: &str) -> Vec<Line<'_>> {
    let mut lines = Vec::new();
    let mut start = 0usize;
    for raw in text.split_inclusive('\n') {
        let end = start.saturating_add(raw.len());
        let trimmed = raw.strip_suffix('\n').unwrap_or(raw);
        let trimmed = trimmed.strip_suffix('\r').unwrap_or(trimmed);
        lines.push(Line {
            start,
            end,
            text: trimmed,
        });
        start = end;
    }
    lines
}

/// Recognise a marker at the start of `line`.
///
/// Returns the section and whatever follows the marker's colon (a suffix of
/// `line`, possibly empty). Trailing text without a colon means the line is
/// prose, not a marker.
fn parse_marker(line: &str) -> Option<(Section, &str)> {
    let rest = line.trim_start().trim_start_matches('#').trim_start();
    let rest = rest.trim_start_matches(MARKER_WRAPPERS);
    let (section, rest) = Section::ALL.into_iter().find_map(|section| {
        let marker = section.marker();
        let head = rest.get(..marker.len())?;
        let tail = rest.get(marker.len()..)?;
        head.eq_ignore_ascii_case(marker).then_some((section, tail))
    })?;

    let rest = rest.trim_start_matches(MARKER_WRAPPERS).trim_start();
    let rest = match rest.strip_prefix('(') {
        Some(inner) => inner.split_once(')')?.1,
        None => rest,
    };
    let rest = rest.trim_start_matches(MARKER_WRAPPERS).trim_start();

    match rest.strip_prefix(':') {
        Some(after) => {
            let inline = after.trim_start_matches(EMPHASIS).trim_start();
            if inline.chars().all(|c| MARKER_WRAPPERS.contains(&c) || c.is_whitespace()) {
                Some((section, ""))
            } else {
                Some((section, inline))
            }
        }
        None if rest.trim_end().is_empty() => Some((section, "")),
        None => None,
    }
}

/// Length of the backtick run opening `line`, and the info string after it.
fn fence(line: &str) -> Option<(usize, &str)> {
    let trimmed = line.trim_start();
    let info = trimmed.trim_start_matches('`');
    let run = trimmed.len().saturating_sub(info.len());
    (run >= MIN_FENCE_LEN).then_some((run, info.trim()))
}

/// Parse an LLM reply into its migration and compact sections.
///
/// Both sections must be present; a reply carrying only one marker is
/// rejected exactly like a reply carrying none, so nothing is ever applied
/// from a half-formed reply.
pub fn parse_llm_response(text: &str) -> Result<ParsedResponse, ParseError> {
    let lines = index_lines(text);
    let find = |wanted: Section| {
        lines
            .iter()
            .position(|l| parse_marker(l.text).is_some_and(|(section, _)| section == wanted))
    };

    let (migration_at, compact_at) = match (find(Section::Migration), find(Section::Compact)) {
        (Some(m), Some(c)) => (m, c),
        (None, None) => return Err(ParseError::NoSections),
        (None, Some(_)) => return Err(ParseError::MissingSection(Section::Migration)),
        (Some(_), None) => return Err(ParseError::MissingSection(Section::Compact)),
    };

    let migration = extract_section(text, &lines, migration_at, Section::Migration)?;
    let compact = extract_section(text, &lines, compact_at, Section::Compact)?;

    let issue_ids = extract_issue_ids(&migration);
    Ok(ParsedResponse {
        migration: ParsedMigration {
            raw_content: migration,
            issue_ids,
        },
        compact: ParsedCompact {
            raw_content: compact,
        },
    })
}

/// Extract the body of the section whose marker sits on `marker_idx`.
fn extract_section(
    text: &str,
    lines: &[Line<'_>],
    marker_idx: usize,
    section: Section,
) -> Result<String, ParseError> {
    let body_first = marker_idx.saturating_add(1);
    let body_last = lines
        .iter()
        .enumerate()
        .skip(body_first)
        .find(|(_, l)| parse_marker(l.text).is_some())
        .map_or(lines.len(), |(idx, _)| idx);

    let mut body = Vec::new();
    if let Some(marker) = lines.get(marker_idx) {
        if let Some((_, inline)) = parse_marker(marker.text).filter(|(_, i)| !i.is_empty()) {
            let offset = marker.text.len().saturating_sub(inline.len());
            body.push(Line {
                start: marker.start.saturating_add(offset),
                end: marker.end,
                text: inline,
            });
        }
    }
    body.extend_from_slice(lines.get(body_first..body_last).unwrap_or(&[]));

    let first_content = body.iter().position(|l| !l.text.trim().is_empty());
    let content = match first_content {
        Some(open_idx) => match body.get(open_idx).and_then(|l| fence(l.text)) {
            Some((open_len, _)) => fenced_content(text, &body, open_idx, open_len, section)?,
            None => span(text, &body).trim().to_string(),
        },
        None => String::new(),
    };

    if content.trim().is_empty() {
        return Err(ParseError::EmptySection(section));
    }
    Ok(content)
}

/// Text between the opening fence at `open_idx` and the fence that closes it.
///
/// A fence with a language tag opens a nested block and the next bare fence
/// at least as long closes it, so code blocks inside the content survive and
/// an outer fence wrapping the whole reply is never mistaken for the close.
/// If nesting never balances, the last bare fence long enough is used. The
/// language tag on the opening fence is dropped.
fn fenced_content(
    text: &str,
    body: &[Line<'_>],
    open_idx: usize,
    open_len: usize,
    section: Section,
) -> Result<String, ParseError> {
    let inner_first = open_idx.saturating_add(1);
    let closes_section = |run: usize, info: &str| info.is_empty() && run >= open_len;

    let mut nested: Vec<usize> = Vec::new();
    let mut close_idx = None;
    for (idx, line) in body.iter().enumerate().skip(inner_first) {
        let Some((run, info)) = fence(line.text) else {
            continue;
        };
        if !info.is_empty() {
            nested.push(run);
            continue;
        }
        match nested.last() {
            Some(&inner) if run >= inner => {
                nested.pop();
            }
            Some(_) => {}
            None if closes_section(run, info) => {
                close_idx = Some(idx);
                break;
            }
            None => {}
        }
    }

    let close_idx = close_idx
        .or_else(|| {
            body.iter()
                .enumerate()
                .skip(inner_first)
                .filter(|(_, l)| fence(l.text).is_some_and(|(run, info)| closes_section(run, info)))
                .map(|(idx, _)| idx)
                .last()
        })
        .ok_or(ParseError::UnclosedFence(section))?;

    let inner = body.get(inner_first..close_idx).unwrap_or(&[]);
    let raw = span(text, inner);
    let raw = raw.strip_suffix('\n').unwrap_or(raw);
    let raw = raw.strip_suffix('\r').unwrap_or(raw);
    Ok(raw.to_string())
}

/// The original text covered by a run of consecutive lines.
fn span<'text>(text: &'text str, lines: &[Line<'_>]) -> &'text str {
    match (lines.first(), lines.last()) {
        (Some(first), Some(last)) => text.get(first.start..last.end).unwrap_or(""),
        _ => "",
    }
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod parser_tests;
