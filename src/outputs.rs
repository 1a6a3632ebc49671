//! Step outputs in the runner's `name<<DELIMITER` file format, and the
//! `::error::` workflow command reported on failure.

use crate::error::{ReleaseError, Result};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

const DELIMITER: &str = "NEXT_RELEASE_EOF";

/// Render outputs as multi-line entries, in the given order.
pub fn format_outputs(outputs: &[(&str, &str)]) -> Result<String> {
    let mut rendered = String::new();
    for (name, value) in outputs {
        if value.lines().any(|line| line == DELIMITER) {
            return Err(ReleaseError::invalid_argument(format!(
                "output '{}' contains the delimiter {}",
                name, DELIMITER
            )));
        }
        rendered.push_str(&format!("{}<<{}\n{}\n{}\n", name, DELIMITER, value, DELIMITER));
    }
    Ok(rendered)
}

/// Append outputs to `path`, or print them when there is no output file.
pub fn write_outputs(path: Option<&Path>, outputs: &[(&str, &str)]) -> Result<()> {
    let rendered = format_outputs(outputs)?;
    match path {
        Some(path) => {
            let mut file = OpenOptions::new().create(true).append(true).open(path)?;
            file.write_all(rendered.as_bytes())?;
        }
        None => print!("{}", rendered),
    }
    Ok(())
}

/// `::error::` workflow command for `message`, escaped so that multi-line
/// messages stay in one annotation.
pub fn error_annotation(message: &str) -> String {
    let escaped = message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A");
    format!("::error::{}", escaped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn formats_single_and_multi_line_values() {
        let rendered = format_outputs(&[
            ("increment", "minor"),
            ("changelog", "- #10\n- #20"),
            ("empty", ""),
        ])
        .unwrap();
        assert_eq!(
            rendered,
            "increment<<NEXT_RELEASE_EOF\nminor\nNEXT_RELEASE_EOF\n\
             changelog<<NEXT_RELEASE_EOF\n- #10\n- #20\nNEXT_RELEASE_EOF\n\
             empty<<NEXT_RELEASE_EOF\n\nNEXT_RELEASE_EOF\n"
        );
    }

    #[test]
    fn rejects_values_containing_the_delimiter() {
        let err = format_outputs(&[("changelog", "- #1\nNEXT_RELEASE_EOF\n- #2")]).unwrap_err();
        assert!(matches!(err, ReleaseError::InvalidArgument(_)));
    }

    #[test]
    fn appends_to_the_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("github_output");
        fs::write(&path, "previous<<X\nstep\nX\n").unwrap();

        write_outputs(Some(&path), &[("next-version", "2.0.0")]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "previous<<X\nstep\nX\nnext-version<<NEXT_RELEASE_EOF\n2.0.0\nNEXT_RELEASE_EOF\n"
        );
    }

    #[test]
    fn nothing_is_written_when_formatting_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("github_output");

        let result = write_outputs(
            Some(&path),
            &[("increment", "patch"), ("changelog", "NEXT_RELEASE_EOF")],
        );

        assert!(result.is_err());
        assert!(!path.exists());
    }

    #[test]
    fn error_annotations_escape_workflow_command_data() {
        assert_eq!(
            error_annotation("Input required and not supplied: token"),
            "::error::Input required and not supplied: token"
        );
        assert_eq!(
            error_annotation("100% failed\r\nsecond line\nthird"),
            "::error::100%25 failed%0D%0Asecond line%0Athird"
        );
    }
}
