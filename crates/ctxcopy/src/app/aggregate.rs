//! Building the clipboard and aggregate output texts.
//!
//! Both builders walk an ordered batch, resolve each entry once, and skip
//! entries that fail to resolve without aborting the rest. The clipboard
//! format labels blocks with the 1-based position in the *input* batch, so
//! labels are not renumbered around skipped entries.

use tracing::warn;

use crate::app::resolve::Resolver;
use crate::domain::errors::ResolveError;
use crate::domain::model::{DocRef, Tab};

/// First line of every aggregate artifact. Also how stale scratch buffers are
/// recognized for cleanup.
pub const AGGREGATE_HEADER: &str = "// Aggregated file contents:";

const BLOCK_SEPARATOR: &str = "\n\n---\n\n";

/// Outcome of a build: the assembled text (absent when nothing resolved),
/// how many entries made it in, and which ones were skipped.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub text: Option<String>,
    pub resolved: usize,
    pub skipped: Vec<(String, ResolveError)>,
}

/// Assemble the clipboard format: one `// File {n}: /{path}` block per
/// resolvable reference, joined by the separator.
pub fn build_clipboard_text(resolver: &Resolver, refs: &[DocRef]) -> BuildReport {
    let mut report = BuildReport::default();
    let mut blocks = Vec::with_capacity(refs.len());

    for (index, doc) in refs.iter().enumerate() {
        match resolver.resolve(doc) {
            Ok(file) => blocks.push(format!(
                "// File {}: /{}\n\n{}",
                index + 1,
                file.relative_path,
                file.content
            )),
            Err(err) => {
                warn!(doc = %doc, error = %err, "skipping unresolvable document");
                report.skipped.push((doc.to_string(), err));
            }
        }
    }

    report.resolved = blocks.len();
    if !blocks.is_empty() {
        report.text = Some(blocks.join(BLOCK_SEPARATOR));
    }
    report
}

/// Assemble the aggregate format destined for a new scratch document: a fixed
/// header, then one `// {path}` block per resolvable text tab. Non-text tabs
/// are silently skipped.
pub fn build_aggregate_text(resolver: &Resolver, tabs: &[Tab]) -> BuildReport {
    let mut report = BuildReport::default();
    let mut body = String::new();

    for tab in tabs {
        let Some(doc) = tab.document() else { continue };
        match resolver.resolve(doc) {
            Ok(file) => {
                body.push_str(&format!(
                    "// {}\n\n{}{}",
                    file.relative_path, file.content, BLOCK_SEPARATOR
                ));
                report.resolved += 1;
            }
            Err(err) => {
                warn!(doc = %doc, error = %err, "skipping unresolvable document");
                report.skipped.push((doc.to_string(), err));
            }
        }
    }

    if !body.is_empty() {
        // Drop the dangling "---\n\n" so the artifact ends right after the
        // last block's trailing blank line.
        body.truncate(body.len() - "---\n\n".len());
        report.text = Some(format!("{AGGREGATE_HEADER}\n\n{body}"));
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;
    use std::path::{Path, PathBuf};

    use crate::domain::model::TabInput;

    fn file_tab(path: impl Into<PathBuf>) -> Tab {
        Tab {
            input: TabInput::Document(DocRef::File(path.into())),
            active: false,
        }
    }

    fn write(root: &Path, rel: &str, content: &str) -> PathBuf {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn clipboard_blocks_follow_input_order() {
        let temp = tempfile::tempdir().unwrap();
        let a = write(temp.path(), "a.txt", "alpha");
        let b = write(temp.path(), "b.txt", "beta");

        let resolver = Resolver::new(Some(temp.path().to_path_buf()));
        let report =
            build_clipboard_text(&resolver, &[DocRef::File(a), DocRef::File(b)]);

        assert_eq!(report.resolved, 2);
        assert_eq!(
            report.text.unwrap(),
            "// File 1: /a.txt\n\nalpha\n\n---\n\n// File 2: /b.txt\n\nbeta"
        );
    }

    #[test]
    fn clipboard_keeps_original_indices_across_failures() {
        let temp = tempfile::tempdir().unwrap();
        let a = write(temp.path(), "a.txt", "alpha");
        let c = write(temp.path(), "c.txt", "gamma");

        let resolver = Resolver::new(Some(temp.path().to_path_buf()));
        let refs = [
            DocRef::File(a),
            DocRef::File(temp.path().join("missing.txt")),
            DocRef::File(c),
        ];
        let report = build_clipboard_text(&resolver, &refs);

        assert_eq!(report.resolved, 2);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(
            report.text.unwrap(),
            "// File 1: /a.txt\n\nalpha\n\n---\n\n// File 3: /c.txt\n\ngamma"
        );
    }

    #[test]
    fn clipboard_of_untitled_document() {
        let resolver = Resolver::new(None)
            .with_open_documents([("scratch.txt".to_owned(), "hello".to_owned())]);

        let report =
            build_clipboard_text(&resolver, &[DocRef::Untitled("scratch.txt".into())]);
        assert_eq!(report.text.unwrap(), "// File 1: /scratch.txt\n\nhello");
    }

    #[test]
    fn empty_and_all_failing_batches_yield_no_text() {
        let resolver = Resolver::new(None);

        let report = build_clipboard_text(&resolver, &[]);
        assert!(report.text.is_none());
        assert_eq!(report.resolved, 0);

        let refs = [DocRef::File(PathBuf::from("/nope/a")), DocRef::File(PathBuf::from("/nope/b"))];
        let report = build_clipboard_text(&resolver, &refs);
        assert!(report.text.is_none());
        assert_eq!(report.skipped.len(), 2);

        let tabs = [file_tab("/nope/a"), file_tab("/nope/b")];
        let report = build_aggregate_text(&resolver, &tabs);
        assert!(report.text.is_none());
    }

    #[test]
    fn aggregate_has_header_and_no_trailing_separator() {
        let temp = tempfile::tempdir().unwrap();
        let a = write(temp.path(), "a.ts", "A");
        let b = write(temp.path(), "sub/b.ts", "B");

        let resolver = Resolver::new(Some(temp.path().to_path_buf()));
        let report = build_aggregate_text(&resolver, &[file_tab(a), file_tab(b)]);

        assert_eq!(
            report.text.unwrap(),
            "// Aggregated file contents:\n\n// a.ts\n\nA\n\n---\n\n// sub/b.ts\n\nB\n\n"
        );
    }

    #[test]
    fn aggregate_skips_non_text_tabs() {
        let temp = tempfile::tempdir().unwrap();
        let a = write(temp.path(), "a.txt", "alpha");

        let resolver = Resolver::new(Some(temp.path().to_path_buf()));
        let tabs = [
            Tab {
                input: TabInput::Other("diff view".into()),
                active: false,
            },
            file_tab(a),
        ];
        let report = build_aggregate_text(&resolver, &tabs);

        assert_eq!(report.resolved, 1);
        assert_eq!(
            report.text.unwrap(),
            "// Aggregated file contents:\n\n// a.txt\n\nalpha\n\n"
        );
    }

    #[test]
    fn builds_are_idempotent() {
        let temp = tempfile::tempdir().unwrap();
        let a = write(temp.path(), "a.txt", "alpha");

        let resolver = Resolver::new(Some(temp.path().to_path_buf()));
        let refs = [DocRef::File(a.clone())];
        let first = build_clipboard_text(&resolver, &refs).text.unwrap();
        let second = build_clipboard_text(&resolver, &refs).text.unwrap();
        assert_eq!(first, second);

        let tabs = [file_tab(a)];
        let first = build_aggregate_text(&resolver, &tabs).text.unwrap();
        let second = build_aggregate_text(&resolver, &tabs).text.unwrap();
        assert_eq!(first, second);
    }
}
