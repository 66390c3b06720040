use std::path::PathBuf;

use crate::config::Config;
use crate::models::ParseResult;

/// Recover the description and file list from edited draft text.
///
/// The first line is the description, verbatim. Every later line containing
/// the configured marker contributes the text after its first occurrence as a
/// path; all other lines are ignored. Paths keep document order and duplicates.
///
/// Pure: no abort policy is applied here, see [`ParseResult::validate`].
pub fn parse(text: &str, config: &Config) -> ParseResult {
    let marker = config.marker.as_str();
    let mut lines = text.lines();
    let description = lines.next().unwrap_or_default().to_string();

    let paths = lines
        .filter_map(|line| line.split_once(marker).map(|(_, path)| PathBuf::from(path)))
        .collect();

    ParseResult { description, paths }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_marker(marker: &str) -> Config {
        Config {
            marker: marker.to_string(),
            ..Config::default()
        }
    }

    #[test]
    fn test_empty_text() {
        let result = parse("", &with_marker("# file: "));
        assert_eq!(result.description, "");
        assert!(result.paths.is_empty());
    }

    #[test]
    fn test_description_is_verbatim() {
        let result = parse("  Summer trip, day 2 \n# file: a.jpg\n", &with_marker("# file: "));
        assert_eq!(result.description, "  Summer trip, day 2 ");
        assert_eq!(result.paths, vec![PathBuf::from("a.jpg")]);
    }

    #[test]
    fn test_marker_on_first_line_is_description() {
        let result = parse("# file: a.jpg\n# file: b.jpg", &with_marker("# file: "));
        assert_eq!(result.description, "# file: a.jpg");
        assert_eq!(result.paths, vec![PathBuf::from("b.jpg")]);
    }

    #[test]
    fn test_order_and_duplicates_preserved() {
        let text = "desc\n# comment\n# file: b.jpg\nvalue\n# file: a.jpg\n\n# file: b.jpg\n";
        let result = parse(text, &with_marker("# file: "));
        assert_eq!(
            result.paths,
            vec![
                PathBuf::from("b.jpg"),
                PathBuf::from("a.jpg"),
                PathBuf::from("b.jpg"),
            ]
        );
    }

    #[test]
    fn test_path_remainder_not_trimmed() {
        let result = parse("desc\n# file: my photo.jpg \n", &with_marker("# file: "));
        assert_eq!(result.paths, vec![PathBuf::from("my photo.jpg ")]);
    }

    #[test]
    fn test_bare_marker_reads_commented_lines() {
        let result = parse("desc\n# file: a.jpg\nold\n", &with_marker("file: "));
        assert_eq!(result.paths, vec![PathBuf::from("a.jpg")]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let result = parse("Summer\r\n# file: a.jpg\r\nold\r\n", &with_marker("# file: "));
        assert_eq!(result.description, "Summer");
        assert_eq!(result.paths, vec![PathBuf::from("a.jpg")]);
    }
}
