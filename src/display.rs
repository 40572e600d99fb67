//! Aligned table rendering of a document, for debugging and snapshot
//! tests. Not an output format: serialization lives with the consumer.

use std::fmt;

use unicode_width::UnicodeWidthStr;

use crate::document::Document;

const HEADERS: [&str; 9] = [
    "#", "TEXT", "LEMMA", "CAT", "HEAD", "REL", "IOB", "TYPE", "FEAT",
];

/// `fmt::Display` wrapper rendering the token table of a document.
pub struct DocumentDisplay<'a> {
    document: &'a Document,
}

impl Document {
    pub fn display(&self) -> DocumentDisplay<'_> {
        DocumentDisplay { document: self }
    }
}

impl fmt::Display for DocumentDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let doc = self.document;
        if doc.error() {
            return write!(f, "<error> {}", doc.error_message());
        }

        if doc.is_empty() {
            f.write_str("(empty document)")?;
        } else {
            let mut rows: Vec<[String; 9]> = Vec::with_capacity(doc.len() + 1);
            rows.push(HEADERS.map(str::to_string));
            for token in doc.iter() {
                rows.push([
                    token.index.to_string(),
                    token.text.clone(),
                    token.lemma.clone(),
                    token.category.to_string(),
                    token.head.to_string(),
                    token.relation.clone(),
                    token.iob.to_string(),
                    token.entity_type.clone(),
                    token.features.clone(),
                ]);
            }

            let mut widths = [0usize; 9];
            for row in &rows {
                for (column, cell) in row.iter().enumerate() {
                    widths[column] = widths[column].max(UnicodeWidthStr::width(cell.as_str()));
                }
            }

            for (line, row) in rows.iter().enumerate() {
                if line > 0 {
                    f.write_str("\n")?;
                }
                for (column, cell) in row.iter().enumerate() {
                    if column > 0 {
                        f.write_str("  ")?;
                    }
                    f.write_str(cell)?;
                    if column + 1 < row.len() {
                        let pad = widths[column] - UnicodeWidthStr::width(cell.as_str());
                        for _ in 0..pad {
                            f.write_str(" ")?;
                        }
                    }
                }
            }
        }

        if !doc.sentences().is_empty() {
            let spans: Vec<String> = doc
                .sentences()
                .iter()
                .map(|s| format!("{}..{}", s.start, s.end))
                .collect();
            write!(f, "\nsentences: {}", spans.join(", "))?;
        }
        Ok(())
    }
}
