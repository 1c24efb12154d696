//! Commit message sanitization.
//!
//! Git hands hooks the message exactly as the editor left it: comment lines
//! from the commit template and, with `git commit --verbose`, the full diff
//! below a scissors line. Neither belongs in a cached message.

/// Scissors line git inserts above the verbose diff.
pub const VERBOSE_MARKER: &str = "# ------------------------ >8 ------------------------";

/// Prefix marking a comment line in a commit message.
const COMMENT_PREFIX: char = '#';

/// Removes the verbose marker line and everything after it.
///
/// Only a line that is exactly the marker counts. Text before the marker,
/// including the newline that ends the preceding line, is kept as is.
pub fn strip_verbose_section(content: &str) -> String {
    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        let body = line.strip_suffix('\n').unwrap_or(line);
        if body == VERBOSE_MARKER {
            return content[..offset].to_string();
        }
        offset += line.len();
    }
    content.to_string()
}

/// Removes every line starting with `#`, keeping blank lines and order.
pub fn strip_comment_lines(content: &str) -> String {
    content
        .split('\n')
        .filter(|line| !line.starts_with(COMMENT_PREFIX))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Applies [`strip_verbose_section`] and then [`strip_comment_lines`].
pub fn sanitize(content: &str) -> String {
    strip_comment_lines(&strip_verbose_section(content))
}
