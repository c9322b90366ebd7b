use std::fmt;
use std::str::FromStr;

use crate::error::{CcError, Result};

const RECORD_SEPARATOR: &str = "\n\n";

/// One timed caption unit. Only `text` is ever rewritten by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    sequence_id: String,
    time_range: String,
    pub text: String,
}

impl Segment {
    pub fn new(sequence_id: impl Into<String>, time_range: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            sequence_id: sequence_id.into(),
            time_range: time_range.into(),
            text: text.into(),
        }
    }

    pub fn sequence_id(&self) -> &str {
        &self.sequence_id
    }

    /// Opaque timing line, e.g. `00:00:01,000 --> 00:00:02,000`.
    pub fn time_range(&self) -> &str {
        &self.time_range
    }
}

/// Ordered caption segments parsed from SRT-style container text.
///
/// `Clone` is a full deep copy: every segment owns its strings, so the
/// per-language copies produced during translation never share state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentedDocument {
    segments: Vec<Segment>,
}

impl SegmentedDocument {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// Parse container text. Records are separated by a blank line (one
    /// holding at most whitespace); within a record the first line is the
    /// sequence id, the second the time range and every remaining line
    /// belongs to the caption text, whose line breaks are kept.
    pub fn parse(raw: &str) -> Result<Self> {
        let normalized = raw.replace("\r\n", "\n");
        let mut segments = Vec::new();
        let mut record: Vec<&str> = Vec::new();

        for line in normalized.split('\n').chain(std::iter::once("")) {
            if !line.trim().is_empty() {
                record.push(line);
                continue;
            }
            if record.is_empty() {
                continue;
            }

            if record.len() < 2 {
                return Err(CcError::MalformedDocument {
                    record: segments.len() + 1,
                    reason: format!("expected sequence id and time range, got {:?}", record.join("\n")),
                });
            }
            segments.push(Segment::new(record[0], record[1], record[2..].join("\n")));
            record.clear();
        }

        if segments.is_empty() {
            return Err(CcError::MalformedDocument {
                record: 0,
                reason: "document contains no caption records".to_string(),
            });
        }

        Ok(Self { segments })
    }

    pub fn serialize(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            out.push_str(&segment.sequence_id);
            out.push('\n');
            out.push_str(&segment.time_range);
            out.push('\n');
            out.push_str(&segment.text);
            out.push_str(RECORD_SEPARATOR);
        }
        out
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn segments_mut(&mut self) -> &mut [Segment] {
        &mut self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Caption texts in display order, ready to be sent for translation.
    pub fn texts(&self) -> Vec<String> {
        self.segments.iter().map(|s| s.text.clone()).collect()
    }

    /// Clone this document and overwrite each segment's text positionally.
    pub fn with_texts(&self, texts: &[String]) -> Result<Self> {
        if texts.len() != self.segments.len() {
            return Err(CcError::LengthMismatch {
                expected: self.segments.len(),
                actual: texts.len(),
            });
        }

        let mut copy = self.clone();
        for (segment, text) in copy.segments.iter_mut().zip(texts) {
            segment.text = sanitize_text(text);
        }
        Ok(copy)
    }
}

/// A blank or whitespace-only line inside caption text would split the
/// record on the next parse, so translated text is folded back to
/// non-empty lines.
fn sanitize_text(text: &str) -> String {
    text.replace("\r\n", "\n")
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

impl FromStr for SegmentedDocument {
    type Err = CcError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for SegmentedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "1\n00:00:01,000 --> 00:00:02,000\nHello\n\n2\n00:00:02,500 --> 00:00:03,000\nWorld";

    #[test]
    fn test_parse_two_segments() {
        let doc = SegmentedDocument::parse(SAMPLE).unwrap();
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.segments()[0].sequence_id(), "1");
        assert_eq!(doc.segments()[0].time_range(), "00:00:01,000 --> 00:00:02,000");
        assert_eq!(doc.texts(), vec!["Hello".to_string(), "World".to_string()]);
    }

    #[test]
    fn test_trailing_separator_does_not_add_segment() {
        let raw = format!("{}\n\n", SAMPLE);
        let doc = SegmentedDocument::parse(&raw).unwrap();
        assert_eq!(doc.len(), 2);

        let padded = format!("{}\n\n   \n\n\n", SAMPLE);
        assert_eq!(SegmentedDocument::parse(&padded).unwrap().len(), 2);
    }

    #[test]
    fn test_whitespace_only_line_separates_records() {
        let raw = "1\n00:00:01,000 --> 00:00:02,000\nHello\n \t\n2\n00:00:02,500 --> 00:00:03,000\nWorld\n";
        let doc = SegmentedDocument::parse(raw).unwrap();
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.texts(), vec!["Hello", "World"]);
        assert_eq!(doc.segments()[1].sequence_id(), "2");
        assert_eq!(doc.segments()[1].time_range(), "00:00:02,500 --> 00:00:03,000");
    }

    #[test]
    fn test_round_trip() {
        let raw = "7\n00:00:01,000 --> 00:00:02,000\nfirst line\nsecond line\n\n9\n00:00:05,000 --> 00:00:06,000\n\n\n12\nbogus timing\nkept verbatim\n";
        let parsed = SegmentedDocument::parse(raw).unwrap();
        let reparsed = SegmentedDocument::parse(&parsed.serialize()).unwrap();
        assert_eq!(parsed, reparsed);
        assert_eq!(reparsed.segments()[0].sequence_id(), "7");
        assert_eq!(reparsed.segments()[2].sequence_id(), "12");
        assert_eq!(reparsed.segments()[2].time_range(), "bogus timing");
    }

    #[test]
    fn test_multiline_text_keeps_line_breaks() {
        let raw = "1\n00:00:01,000 --> 00:00:02,000\nline one\nline two";
        let doc = SegmentedDocument::parse(raw).unwrap();
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.segments()[0].text, "line one\nline two");
    }

    #[test]
    fn test_crlf_input() {
        let raw = SAMPLE.replace('\n', "\r\n");
        let doc = SegmentedDocument::parse(&raw).unwrap();
        assert_eq!(doc, SegmentedDocument::parse(SAMPLE).unwrap());
    }

    #[test]
    fn test_serialize_format() {
        let doc = SegmentedDocument::parse(SAMPLE).unwrap();
        assert_eq!(
            doc.serialize(),
            "1\n00:00:01,000 --> 00:00:02,000\nHello\n\n2\n00:00:02,500 --> 00:00:03,000\nWorld\n\n"
        );
        assert_eq!(doc.to_string(), doc.serialize());
    }

    #[test]
    fn test_record_without_time_range_is_malformed() {
        let raw = "1\n00:00:01,000 --> 00:00:02,000\nHello\n\n2";
        match SegmentedDocument::parse(raw) {
            Err(CcError::MalformedDocument { record, .. }) => assert_eq!(record, 2),
            other => panic!("expected MalformedDocument, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_input_is_malformed() {
        assert!(matches!(
            SegmentedDocument::parse("\n\n  \n"),
            Err(CcError::MalformedDocument { .. })
        ));
    }

    #[test]
    fn test_clone_is_independent() {
        let original = SegmentedDocument::parse(SAMPLE).unwrap();
        let mut first = original.clone();
        let second = original.clone();

        first.segments_mut()[0].text = "Hallo".to_string();

        assert_eq!(original.segments()[0].text, "Hello");
        assert_eq!(second.segments()[0].text, "Hello");
        assert_eq!(first.segments()[0].text, "Hallo");
    }

    #[test]
    fn test_with_texts_overwrites_positionally() {
        let doc = SegmentedDocument::parse(SAMPLE).unwrap();
        let translated = doc
            .with_texts(&["HELLO".to_string(), "WORLD".to_string()])
            .unwrap();

        assert_eq!(translated.texts(), vec!["HELLO".to_string(), "WORLD".to_string()]);
        assert_eq!(translated.segments()[1].sequence_id(), "2");
        assert_eq!(translated.segments()[1].time_range(), "00:00:02,500 --> 00:00:03,000");
        assert_eq!(doc.segments()[0].text, "Hello");
    }

    #[test]
    fn test_with_texts_rejects_length_mismatch() {
        let doc = SegmentedDocument::parse(SAMPLE).unwrap();
        let err = doc.with_texts(&["only one".to_string()]).unwrap_err();
        assert!(matches!(err, CcError::LengthMismatch { expected: 2, actual: 1 }));
    }

    #[test]
    fn test_blank_lines_in_translation_cannot_split_records() {
        let doc = SegmentedDocument::parse(SAMPLE).unwrap();
        let translated = doc
            .with_texts(&["a\n  \nb".to_string(), "c\n".to_string()])
            .unwrap();
        assert_eq!(translated.segments()[0].text, "a\nb");
        assert_eq!(translated.segments()[1].text, "c");

        let reparsed = SegmentedDocument::parse(&translated.serialize()).unwrap();
        assert_eq!(reparsed, translated);
    }
}
