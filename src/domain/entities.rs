//! Domain entities: the in-memory file buffer and per-run reports.

use std::path::PathBuf;

/// Ordered lines of one file, held between the read and the write pass.
///
/// Lines are raw bytes so files in any encoding pass through. Terminators
/// (`\n`, `\r\n` or a lone `\r`) are stripped on read, and `render()`
/// always produces `\n`-terminated output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineBuffer {
    lines: Vec<Vec<u8>>,
}

impl LineBuffer {
    /// Split content into lines.
    ///
    /// A final terminator does not start another line, so `b"a\n"` and
    /// `b"a"` both hold one line.
    pub fn from_content(content: &[u8]) -> Self {
        let mut lines = Vec::new();
        let mut rest = content;

        while !rest.is_empty() {
            match rest.iter().position(|&b| b == b'\n' || b == b'\r') {
                Some(end) => {
                    lines.push(rest[..end].to_vec());
                    let crlf = rest[end] == b'\r' && rest.get(end + 1) == Some(&b'\n');
                    rest = &rest[end + if crlf { 2 } else { 1 }..];
                }
                None => {
                    lines.push(rest.to_vec());
                    break;
                }
            }
        }

        Self { lines }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> &[Vec<u8>] {
        &self.lines
    }

    pub fn lines_mut(&mut self) -> &mut [Vec<u8>] {
        &mut self.lines
    }

    /// Join lines with `\n`, terminating the last line as well.
    ///
    /// A file that lacked a final newline gains one; an empty buffer
    /// renders as nothing.
    pub fn render(&self) -> Vec<u8> {
        let capacity = self.lines.iter().map(|l| l.len() + 1).sum();
        let mut out = Vec::with_capacity(capacity);
        for line in &self.lines {
            out.extend_from_slice(line);
            out.push(b'\n');
        }
        out
    }
}

/// Outcome of rewriting a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    /// Full path of the rewritten file
    pub path: PathBuf,
    /// Base name used in the replacement token
    pub file_name: String,
    /// Number of lines written
    pub lines: usize,
    /// Marker lines whose citation changed
    pub rewritten: usize,
    /// Whether the written bytes differ from what was read
    pub changed: bool,
}

/// Reports of every file processed in a run, in visit order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub files: Vec<FileReport>,
}

impl RunSummary {
    pub fn files_processed(&self) -> usize {
        self.files.len()
    }

    pub fn files_changed(&self) -> usize {
        self.files.iter().filter(|f| f.changed).count()
    }

    pub fn lines_rewritten(&self) -> usize {
        self.files.iter().map(|f| f.rewritten).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_content_without_final_newline_when_render_then_appends_one() {
        let buffer = LineBuffer::from_content(b"a\nb");
        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.render(), b"a\nb\n");
    }

    #[test]
    fn given_crlf_content_when_render_then_normalizes_to_lf() {
        let buffer = LineBuffer::from_content(b"a\r\nb\r\n");
        assert_eq!(buffer.render(), b"a\nb\n");
    }

    #[test]
    fn given_lone_carriage_return_when_split_then_starts_new_line() {
        let buffer = LineBuffer::from_content(b"a\rb\r\r\nc");
        assert_eq!(buffer.lines(), &[b"a".to_vec(), b"b".to_vec(), b"".to_vec(), b"c".to_vec()]);
        assert_eq!(buffer.render(), b"a\nb\n\nc\n");
    }

    #[test]
    fn given_empty_content_when_render_then_stays_empty() {
        let buffer = LineBuffer::from_content(b"");
        assert!(buffer.is_empty());
        assert!(buffer.render().is_empty());
    }

    #[test]
    fn given_blank_lines_when_render_then_preserves_them() {
        let buffer = LineBuffer::from_content(b"a\n\n\nb\n");
        assert_eq!(buffer.len(), 4);
        assert_eq!(buffer.render(), b"a\n\n\nb\n");
    }

    #[test]
    fn given_non_utf8_bytes_when_render_then_kept_verbatim() {
        let buffer = LineBuffer::from_content(b"// caf\xe9\nx");
        assert_eq!(buffer.lines()[0], b"// caf\xe9");
        assert_eq!(buffer.render(), b"// caf\xe9\nx\n");
    }

    #[test]
    fn given_reports_when_summarizing_then_counts_changes() {
        let report = |changed, rewritten| FileReport {
            path: PathBuf::from("x.js"),
            file_name: "x.js".into(),
            lines: 10,
            rewritten,
            changed,
        };
        let summary = RunSummary {
            files: vec![report(true, 2), report(false, 0), report(true, 1)],
        };

        assert_eq!(summary.files_processed(), 3);
        assert_eq!(summary.files_changed(), 2);
        assert_eq!(summary.lines_rewritten(), 3);
    }
}
