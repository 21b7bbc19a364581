//! Inline spoiler markup
//!
//! Question text may contain `[...]` spans that are hidden until the reader
//! reveals them. The stored text keeps the brackets; this module only splits
//! it for display.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use utoipa::ToSchema;

static SPOILER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]]*)\]").expect("valid regex"));

/// Piece of displayed text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Segment {
    Text { text: String },
    Spoiler { text: String },
}

/// Split text into plain and spoiler segments, in order.
///
/// Empty plain runs are dropped. An opening bracket without a matching
/// close stays literal text.
pub fn spoiler_segments(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut cursor = 0;

    for caps in SPOILER.captures_iter(text) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > cursor {
            segments.push(Segment::Text {
                text: text[cursor..whole.start()].to_string(),
            });
        }
        segments.push(Segment::Spoiler {
            text: inner.as_str().to_string(),
        });
        cursor = whole.end();
    }

    if cursor < text.len() {
        segments.push(Segment::Text {
            text: text[cursor..].to_string(),
        });
    }

    segments
}
