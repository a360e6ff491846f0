use crate::ParseError;
use ariadne::{Config, IndexType, Label, Report, ReportKind, Source};
use std::io;
use std::ops::Range;

const SOURCE_ID: &str = "REPL";

type ParseReport = Report<'static, (&'static str, Range<usize>)>;

// Errors at end of input carry an empty span just past the last byte; point
// at the last character instead so the label lands inside the source.
fn label_range(range: Range<usize>, input: &str) -> Range<usize> {
    if range.start < input.len() {
        range.start..range.end.min(input.len())
    } else {
        let last = input.char_indices().last().map_or(0, |(i, _)| i);
        last..input.len()
    }
}

impl ParseError {
    fn report(&self, input: &str, color: bool) -> ParseReport {
        let span = (SOURCE_ID, label_range(self.span().to_range(), input));
        let label = match self {
            ParseError::UnexpectedToken { expected, .. } => {
                Label::new(span.clone()).with_message(format!("expected {} here", expected))
            }
            ParseError::NoPrefixRule { .. } => {
                Label::new(span.clone()).with_message("this cannot start an expression")
            }
            ParseError::InvalidInteger { .. } => {
                Label::new(span.clone()).with_message("does not fit in a 64-bit integer")
            }
        };
        Report::build(ReportKind::Error, span)
            // Spans are byte offsets
            .with_config(
                Config::default()
                    .with_color(color)
                    .with_index_type(IndexType::Byte),
            )
            .with_message(self.to_string())
            .with_label(label)
            .finish()
    }

    /// Prints the error to stderr, labelled against the source it came from.
    pub fn pretty_print(&self, input: &str) -> io::Result<()> {
        self.report(input, true).eprint((SOURCE_ID, Source::from(input)))
    }

    #[cfg(test)]
    fn render(&self, input: &str) -> io::Result<String> {
        let mut buffer = Vec::new();
        self.report(input, false)
            .write((SOURCE_ID, Source::from(input)), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
