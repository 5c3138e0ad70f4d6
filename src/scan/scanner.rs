use memchr::memmem::Finder;

use super::tag::find_widget_tag;
use super::{Marker, Skip};
use crate::content::ContentBlock;
use crate::error::ScanError;
use crate::limits::{MAX_MARKERS, MAX_SCAN_MATCHES};
use crate::range::Span;
use crate::widget::WidgetName;

/// Split `text` at the positions named by `markers`.
///
/// One left-to-right pass. At each step the earliest match across all
/// markers is found. Any match whose span intersects it is a competing
/// candidate, and the first declared marker among the candidates is taken.
/// Pending text is flushed, the marker's widgets are emitted, and scanning
/// resumes after the marker and its skip range.
///
/// Text blocks are slices of `text`. Blank runs are dropped.
pub fn scan<'a>(text: &'a str, markers: &[Marker]) -> Result<Vec<ContentBlock<'a>>, ScanError> {
    if markers.len() > MAX_MARKERS {
        return Err(ScanError::TooManyMarkers { limit: MAX_MARKERS });
    }
    let compiled = markers
        .iter()
        .enumerate()
        .map(|(index, marker)| Compiled::new(index, marker))
        .collect::<Result<Vec<_>, _>>()?;

    let bytes = text.as_bytes();
    let len = bytes.len();
    let mut blocks: Vec<ContentBlock<'a>> = Vec::new();
    let mut next = vec![Next::Unknown; markers.len()];
    // Markers are searched from `cursor`; pending text starts at `text_start`.
    // They differ only after a `Skip::Keep` anchor, whose text is kept.
    let mut cursor = 0;
    let mut text_start = 0;
    let mut matches = 0;

    loop {
        let mut best: Option<(usize, Hit)> = None;
        for (index, compiled) in compiled.iter().enumerate() {
            let hit = match next[index] {
                Next::At(hit) if hit.span.start_usize() >= cursor => hit,
                Next::Exhausted => continue,
                Next::At(_) | Next::Unknown => match compiled.find(bytes, cursor) {
                    Some(hit) => {
                        next[index] = Next::At(hit);
                        hit
                    }
                    None => {
                        next[index] = Next::Exhausted;
                        continue;
                    }
                },
            };
            if best.is_none_or(|(_, current)| hit.span.start < current.span.start) {
                best = Some((index, hit));
            }
        }

        let Some((mut index, mut hit)) = best else {
            break;
        };
        // Candidates overlapping the earliest match go to the first declared.
        for (other, slot) in next.iter().enumerate().take(index) {
            if let Next::At(candidate) = *slot {
                if candidate.span.start_usize() >= cursor && candidate.span.start < hit.span.end {
                    index = other;
                    hit = candidate;
                    break;
                }
            }
        }
        matches += 1;
        if matches > MAX_SCAN_MATCHES {
            return Err(ScanError::TooManyMatches {
                limit: MAX_SCAN_MATCHES,
            });
        }

        push_text(text, text_start, hit.span.start_usize(), &mut blocks);
        let hit_end = hit.span.end_usize();

        match &markers[index] {
            Marker::Tag { widget, .. } => {
                blocks.push(ContentBlock::Widget(*widget));
                cursor = hit_end;
                text_start = hit_end;
            }
            Marker::KnownTags => {
                if let Some(widget) = hit.widget {
                    blocks.push(ContentBlock::widget(widget));
                }
                cursor = hit_end;
                text_start = hit_end;
            }
            Marker::Anchor { widgets, skip, .. } => {
                blocks.extend(widgets.iter().copied().map(ContentBlock::Widget));
                match skip {
                    Skip::Keep => {
                        text_start = hit.span.start_usize();
                        cursor = hit_end;
                    }
                    Skip::Until(_) => {
                        let resume = compiled[index]
                            .until
                            .as_ref()
                            .and_then(|finder| finder.find(&bytes[hit_end..]))
                            .map_or(len, |offset| hit_end + offset);
                        text_start = resume;
                        cursor = resume;
                    }
                    Skip::ToEnd => {
                        text_start = len;
                        cursor = len;
                    }
                }
            }
        }
    }

    push_text(text, text_start, len, &mut blocks);
    Ok(blocks)
}

/// Push `text[start..end]` unless it is blank.
fn push_text<'a>(text: &'a str, start: usize, end: usize, blocks: &mut Vec<ContentBlock<'a>>) {
    if start < end {
        if let Some(block) = ContentBlock::text(Span::from_usize(start, end).slice(text)) {
            blocks.push(block);
        }
    }
}

/// A marker match.
#[derive(Clone, Copy, Debug)]
struct Hit {
    /// The marker token itself (not including any skip range).
    span: Span,
    /// Widget named by a known tag.
    widget: Option<WidgetName>,
}

/// Cached next match per marker.
#[derive(Clone, Copy, Debug)]
enum Next {
    Unknown,
    At(Hit),
    Exhausted,
}

enum Matcher {
    Literal(Finder<'static>),
    KnownTags,
}

struct Compiled {
    matcher: Matcher,
    until: Option<Finder<'static>>,
}

impl Compiled {
    fn new(index: usize, marker: &Marker) -> Result<Self, ScanError> {
        let literal = |needle: &[u8]| {
            if needle.is_empty() {
                Err(ScanError::EmptyLiteral { index })
            } else {
                Ok(Finder::new(needle).into_owned())
            }
        };
        Ok(match marker {
            Marker::Tag { open, close, .. } => {
                let mut needle = Vec::with_capacity(open.len() + close.len());
                needle.extend_from_slice(open.as_bytes());
                needle.extend_from_slice(close.as_bytes());
                Compiled {
                    matcher: Matcher::Literal(literal(&needle)?),
                    until: None,
                }
            }
            Marker::Anchor { literal: anchor, skip, .. } => Compiled {
                matcher: Matcher::Literal(literal(anchor.as_bytes())?),
                until: match skip {
                    Skip::Until(end) => Some(literal(end.as_bytes())?),
                    Skip::Keep | Skip::ToEnd => None,
                },
            },
            Marker::KnownTags => Compiled {
                matcher: Matcher::KnownTags,
                until: None,
            },
        })
    }

    fn find(&self, bytes: &[u8], from: usize) -> Option<Hit> {
        match &self.matcher {
            Matcher::Literal(finder) => {
                let start = from + finder.find(&bytes[from..])?;
                Some(Hit {
                    span: Span::from_usize(start, start + finder.needle().len()),
                    widget: None,
                })
            }
            Matcher::KnownTags => {
                let tag = find_widget_tag(bytes, from)?;
                Some(Hit {
                    span: Span::from_usize(tag.start, tag.end),
                    widget: Some(tag.widget),
                })
            }
        }
    }
}
