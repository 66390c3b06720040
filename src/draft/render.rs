use std::path::Path;

use crate::config::Config;
use crate::models::Manifest;

/// Inserted into marker text found inside a value so the line no longer
/// matches. Invisible in most editors.
const MARKER_BREAK: char = '\u{200B}';

/// Comment block between the description line and the first file line.
pub fn header(field_name: &str) -> String {
    format!(
        "# First line of this file is used for the {field_name}\n\
         # An empty line aborts the change.\n\
         #\n\
         # Files to be modified, and their current value\n\
         # (remove to exclude from editing):\n\
         #\n"
    )
}

/// Whether `path` survives a render/parse round trip: valid UTF-8 and a
/// single line.
pub fn can_render(path: &Path) -> bool {
    path.to_str()
        .is_some_and(|p| !p.is_empty() && !p.contains(['\n', '\r']))
}

/// Render the manifest into draft text, using the field name and marker from
/// `config`. Output depends only on the inputs, so unchanged data always
/// produces a byte-identical draft.
///
/// Callers stage only paths accepted by [`can_render`].
pub fn render(manifest: &Manifest, config: &Config) -> String {
    let marker = &config.marker;
    let mut output = String::new();
    output.push_str(&single_line(&manifest.description));
    output.push('\n');
    output.push_str(&header(&config.field_name));

    for file in &manifest.files {
        output.push_str(marker);
        output.push_str(&file.path.to_string_lossy());
        output.push('\n');
        output.push_str(&defuse(&single_line(file.display_value()), marker));
        output.push('\n');
    }
    output
}

/// Each value occupies exactly one line of the draft.
fn single_line(value: &str) -> String {
    if !value.contains(['\n', '\r']) {
        return value.to_string();
    }
    value
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join(" ")
}

/// The marker without its leading comment characters (`"file: "` for
/// `"# file: "`). Every suffix of the marker that still contains this core is
/// a marker the parser may be configured with.
fn marker_core(marker: &str) -> &str {
    let core = marker.trim_start_matches(['#', ' ', '\t']);
    if core.chars().count() < 2 {
        marker
    } else {
        core
    }
}

/// Break every occurrence of the marker core inside a value line, so no value
/// can be read back as a file line.
fn defuse(value: &str, marker: &str) -> String {
    let core = marker_core(marker);
    let Some((split, _)) = core.char_indices().last() else {
        return value.to_string();
    };
    let broken = format!("{}{}{}", &core[..split], MARKER_BREAK, &core[split..]);

    let mut value = value.to_string();
    while value.contains(core) {
        value = value.replace(core, &broken);
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::parse;
    use crate::models::CandidateFile;
    use std::path::PathBuf;

    fn config(field_name: &str, marker: &str) -> Config {
        Config {
            field_name: field_name.to_string(),
            marker: marker.to_string(),
            ..Config::default()
        }
    }

    #[test]
    fn test_empty_manifest() {
        let output = render(&Manifest::default(), &Config::default());
        assert_eq!(
            output,
            "\n\
             # First line of this file is used for the ImageDescription\n\
             # An empty line aborts the change.\n\
             #\n\
             # Files to be modified, and their current value\n\
             # (remove to exclude from editing):\n\
             #\n"
        );
    }

    #[test]
    fn test_file_blocks() {
        let manifest = Manifest::new(vec![
            CandidateFile::new("beach1.jpg", Some("old".to_string())),
            CandidateFile::new("beach2.jpg", None),
            CandidateFile::new("beach3.jpg", Some(String::new())),
        ]);
        let output = render(&manifest, &Config::default());
        assert!(output.ends_with(
            "#\n# file: beach1.jpg\nold\n# file: beach2.jpg\n\n# file: beach3.jpg\n\n"
        ));
        assert!(output.starts_with('\n'));
    }

    #[test]
    fn test_marker_and_description_are_used() {
        let mut manifest = Manifest::new(vec![CandidateFile::new("a.jpg", None)]);
        manifest.description = "Prefilled".to_string();
        let output = render(&manifest, &config("XPComment", "file: "));
        assert!(output
            .starts_with("Prefilled\n# First line of this file is used for the XPComment\n"));
        assert!(output.ends_with("#\nfile: a.jpg\n\n"));
    }

    #[test]
    fn test_multiline_value_is_flattened() {
        let manifest = Manifest::new(vec![CandidateFile::new(
            "a.jpg",
            Some("line one\r\nline two".to_string()),
        )]);
        let output = render(&manifest, &Config::default());
        assert!(output.ends_with("# file: a.jpg\nline one line two\n"));
    }

    #[test]
    fn test_marker_text_in_value_yields_no_path() {
        let manifest = Manifest::new(vec![
            CandidateFile::new("beach1.jpg", Some("see # file: beach2.jpg".to_string())),
            CandidateFile::new("beach2.jpg", Some("profile: file: x\n# file: y".to_string())),
        ]);

        for marker in ["# file: ", "file: "] {
            let output = render(&manifest, &config("ImageDescription", marker));
            for parse_marker in ["# file: ", " file: ", "file: "] {
                if !marker.ends_with(parse_marker) {
                    continue;
                }
                let result = parse(&output, &config("ImageDescription", parse_marker));
                assert_eq!(
                    result.paths,
                    vec![PathBuf::from("beach1.jpg"), PathBuf::from("beach2.jpg")]
                );
            }
        }
    }

    #[test]
    fn test_defused_value_keeps_its_text() {
        let defused = defuse("see # file: beach2.jpg", "# file: ");
        assert_eq!(defused, "see # file:\u{200B} beach2.jpg");
        assert!(!defused.contains("file: "));
    }

    #[test]
    fn test_self_overlapping_marker_is_defused() {
        let defused = defuse("xxxxx", "xx");
        assert!(!defused.contains("xx"));
    }

    #[test]
    fn test_can_render() {
        assert!(can_render(Path::new("dir/my photo.jpg")));
        assert!(!can_render(Path::new("a\nb.jpg")));
        assert!(!can_render(Path::new("a\rb.jpg")));
        assert!(!can_render(Path::new("")));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_path_cannot_render() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        assert!(!can_render(Path::new(OsStr::from_bytes(b"beach\xff.jpg"))));
    }

    #[test]
    fn test_deterministic() {
        let manifest = Manifest::new(vec![
            CandidateFile::new("b.jpg", Some("x".to_string())),
            CandidateFile::new("a.jpg", None),
        ]);
        assert_eq!(
            render(&manifest, &Config::default()),
            render(&manifest.clone(), &Config::default())
        );
    }
}
