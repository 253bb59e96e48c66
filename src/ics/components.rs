//! Slicing a calendar document into component blocks.

use super::ParseStats;

/// Extract the trimmed bodies between matching `BEGIN:<tag>` / `END:<tag>`
/// markers, in document order. Unterminated blocks are dropped; other
/// component types are ignored entirely.
pub fn extract_components(content: &str, tag: &str) -> Vec<String> {
    extract_components_counted(content, tag, &mut ParseStats::default())
}

pub(crate) fn extract_components_counted(
    content: &str,
    tag: &str,
    stats: &mut ParseStats,
) -> Vec<String> {
    let begin = format!("BEGIN:{tag}");
    let end = format!("END:{tag}");

    let mut blocks = Vec::new();
    let mut cursor = 0;
    while let Some(found) = content[cursor..].find(&begin) {
        let body_start = cursor + found + begin.len();
        let Some(stop) = content[body_start..].find(&end) else {
            tracing::debug!(tag, "unterminated component block dropped");
            stats.unterminated_blocks += 1;
            break;
        };
        blocks.push(content[body_start..body_start + stop].trim().to_string());
        cursor = body_start + stop + end.len();
    }
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_blocks_in_order() {
        let content = "BEGIN:VCALENDAR\nVERSION:2.0\nBEGIN:VEVENT\nUID:event1\nSUMMARY:Event 1\nEND:VEVENT\nBEGIN:VEVENT\nUID:event2\nSUMMARY:Event 2\nEND:VEVENT\nEND:VCALENDAR";
        let blocks = extract_components(content, "VEVENT");
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].contains("UID:event1"));
        assert!(blocks[1].contains("UID:event2"));
    }

    #[test]
    fn ignores_other_component_types() {
        let content = "BEGIN:VCALENDAR\nBEGIN:VTIMEZONE\nTZID:UTC\nEND:VTIMEZONE\nBEGIN:VEVENT\nUID:a\nEND:VEVENT\nEND:VCALENDAR";
        let blocks = extract_components(content, "VEVENT");
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].contains("UID:a"));
    }

    #[test]
    fn drops_unterminated_block() {
        let content = "BEGIN:VEVENT\nUID:done\nEND:VEVENT\nBEGIN:VEVENT\nUID:dangling";
        let mut stats = ParseStats::default();
        let blocks = extract_components_counted(content, "VEVENT", &mut stats);
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].contains("UID:done"));
        assert_eq!(stats.unterminated_blocks, 1);
    }

    #[test]
    fn empty_document_yields_nothing() {
        assert!(extract_components("", "VEVENT").is_empty());
    }
}
