use std::{
    error::Error,
    io::{self, BufRead},
    num::ParseIntError,
};

use anyhow::{Context, Result};
use miette::{
    GraphicalReportHandler, GraphicalTheme, MietteError, MietteSpanContents, SourceCode,
    SourceSpan, SpanContents,
};
use nom::{
    character::complete::digit1,
    combinator::map_res,
    error::{FromExternalError, ParseError},
    IResult,
};
use nom_locate::LocatedSpan;
use nom_supreme::{
    error::{BaseErrorKind, ErrorTree, GenericErrorTree},
    final_parser::final_parser,
};

// Thanks to FasterThanLime! https://fasterthanli.me/series/advent-of-code-2022/part-11

pub type Span<'a> = LocatedSpan<&'a str>;

type ErrorKind = BaseErrorKind<&'static str, Box<dyn Error + Send + Sync + 'static>>;

// One line of a larger input, numbered as it is in that input.
#[derive(Debug)]
struct LineSource {
    text: String,
    line: usize,
}

impl SourceCode for LineSource {
    fn read_span<'a>(
        &'a self,
        span: &SourceSpan,
        context_lines_before: usize,
        context_lines_after: usize,
    ) -> Result<Box<dyn SpanContents<'a> + 'a>, MietteError> {
        let contents = self
            .text
            .read_span(span, context_lines_before, context_lines_after)?;
        Ok(Box::new(MietteSpanContents::new(
            contents.data(),
            *contents.span(),
            contents.line() + self.line,
            contents.column(),
            contents.line_count(),
        )))
    }
}

/// A line that did not parse, with the column where parsing gave up.
#[derive(thiserror::Error, Debug, miette::Diagnostic)]
#[error("bad input")]
pub struct BadInput {
    #[source_code]
    src: LineSource,

    #[label("{kind}")]
    bad_bit: SourceSpan,

    kind: String,
}

impl BadInput {
    /// Byte offset into the line.
    pub fn offset(&self) -> usize {
        self.bad_bit.offset()
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Numbers the line as line `line` (1-based) of the input in reports.
    pub fn at_line(mut self, line: usize) -> Self {
        self.src.line = line.saturating_sub(1);
        self
    }

    /// Renders the line with the failing column labelled.
    pub fn render(&self) -> String {
        let mut s = String::new();
        match GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor())
            .render_report(&mut s, self)
        {
            Ok(()) => s,
            Err(_) => format!(
                "{}:{}: {}: {}",
                self.src.line + 1,
                self.offset() + 1,
                self.src.text,
                self.kind
            ),
        }
    }
}

pub fn parse_unsigned<'a, E>(i: Span<'a>) -> IResult<Span<'a>, u64, E>
where
    E: ParseError<Span<'a>> + FromExternalError<Span<'a>, ParseIntError>,
{
    map_res(digit1, |i: Span<'a>| i.fragment().parse::<u64>())(i)
}

// Alternatives report every branch; the one that got furthest is the useful one.
fn furthest_base<'e, 'a>(e: &'e ErrorTree<Span<'a>>) -> Option<(&'e Span<'a>, &'e ErrorKind)> {
    match e {
        GenericErrorTree::Base { location, kind } => Some((location, kind)),
        GenericErrorTree::Stack { base, .. } => furthest_base(base),
        GenericErrorTree::Alt(siblings) => siblings
            .iter()
            .filter_map(|sibling| furthest_base(sibling))
            .max_by_key(|(location, _)| location.location_offset()),
    }
}

pub fn parse_nice<'a, T, F>(l: &'a str, parse_fun: F) -> Result<T, BadInput>
where
    F: FnMut(Span<'a>) -> IResult<Span<'a>, T, ErrorTree<Span<'a>>>,
{
    let line_span = Span::new(l);
    let line: Result<_, ErrorTree<Span>> = final_parser(parse_fun)(line_span);
    line.map_err(|e| {
        let (offset, kind) = furthest_base(&e)
            .map(|(location, kind)| (location.location_offset(), kind.to_string()))
            .unwrap_or_else(|| (0, "unrecognized input".to_string()));

        BadInput {
            src: LineSource {
                text: l.to_string(),
                line: 0,
            },
            bad_bit: SourceSpan::new(offset.into(), 0.into()),
            kind,
        }
    })
}

pub fn read_input_lines() -> Result<Vec<String>> {
    io::stdin()
        .lock()
        .lines()
        .collect::<io::Result<Vec<_>>>()
        .context("Unable to read input from stdin")
}
