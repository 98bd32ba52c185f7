use std::sync::Arc;

use annotate_snippets::display_list::{DisplayList, FormatOptions};
use annotate_snippets::snippet::*;
use codemap::File;
use proc_macro2::{LineColumn, Span};

/// A loaded source file, used to render diagnostics against it.
#[derive(Debug)]
pub struct Sess {
    pub file: Arc<File>,
    pub color: bool,
}

impl Sess {
    pub fn new(file: &Arc<File>, color: bool) -> Sess {
        Sess {
            file: file.clone(),
            color,
        }
    }

    /// Byte offset of a line/column position. Columns count characters.
    fn pos(&self, lc: LineColumn) -> usize {
        let last_line = self.file.num_lines().saturating_sub(1);
        let line = lc.line.saturating_sub(1).min(last_line);
        let line_start = (self.file.line_span(line).low() - self.file.span.low()) as usize;
        let text = self.file.source_line(line);
        let column = text
            .char_indices()
            .nth(lc.column)
            .map(|(offset, _)| offset)
            .unwrap_or_else(|| text.len());
        line_start + column
    }

    pub fn error_ann<'a>(&self, label: &'a str, span: Span) -> SourceAnnotation<'a> {
        SourceAnnotation {
            annotation_type: AnnotationType::Error,
            label,
            range: (self.pos(span.start()), self.pos(span.end())),
        }
    }

    pub fn error(&self, message: &str, annotations: Vec<SourceAnnotation>) -> String {
        let snippet = Snippet {
            title: Some(Annotation {
                id: None,
                label: Some(message),
                annotation_type: AnnotationType::Error,
            }),
            footer: vec![],
            slices: vec![Slice {
                source: self.file.source(),
                line_start: 1,
                origin: Some(self.file.name()),
                fold: false,
                annotations,
            }],
            opt: FormatOptions {
                color: self.color,
                ..Default::default()
            },
        };

        DisplayList::from(snippet).to_string()
    }
}
