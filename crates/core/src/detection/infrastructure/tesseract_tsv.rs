use thiserror::Error;

use crate::shared::bounding_box::BoundingBox;

/// Tesseract's `level` value for word rows.
const WORD_LEVEL: u32 = 5;

#[derive(Error, Debug, PartialEq)]
pub enum TsvError {
    #[error("TSV input is empty")]
    Empty,
    #[error("TSV header lacks column '{0}'")]
    MissingColumn(&'static str),
    #[error("line {line}: missing '{column}' value")]
    MissingValue { line: usize, column: &'static str },
    #[error("line {line}: invalid '{column}' value '{value}'")]
    InvalidValue {
        line: usize,
        column: &'static str,
        value: String,
    },
}

/// One recognized word from Tesseract TSV output.
#[derive(Clone, Debug, PartialEq)]
pub struct TsvWord {
    pub bbox: BoundingBox,
    pub confidence: f64,
    pub text: String,
}

struct Columns {
    level: usize,
    left: usize,
    top: usize,
    width: usize,
    height: usize,
    conf: usize,
    text: usize,
}

impl Columns {
    fn from_header(header: &str) -> Result<Self, TsvError> {
        let names: Vec<&str> = header.split('\t').map(str::trim).collect();
        let find = |name: &'static str| {
            names
                .iter()
                .position(|n| *n == name)
                .ok_or(TsvError::MissingColumn(name))
        };
        Ok(Self {
            level: find("level")?,
            left: find("left")?,
            top: find("top")?,
            width: find("width")?,
            height: find("height")?,
            conf: find("conf")?,
            text: find("text")?,
        })
    }
}

/// Parses `tesseract ... tsv` output into word boxes, in output order.
///
/// Only word-level rows with non-blank text are kept; page, block,
/// paragraph and line rows are skipped. Line numbers in errors are 1-based.
pub fn parse_words(tsv: &str) -> Result<Vec<TsvWord>, TsvError> {
    let mut lines = tsv.lines().enumerate();
    let header = loop {
        match lines.next() {
            Some((_, line)) if line.trim().is_empty() => continue,
            Some((_, line)) => break line,
            None => return Err(TsvError::Empty),
        }
    };
    let columns = Columns::from_header(header)?;

    let mut words = Vec::new();
    for (index, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        let line_no = index + 1;
        let fields: Vec<&str> = line.split('\t').collect();

        let level: u32 = parse_field(&fields, columns.level, "level", line_no)?;
        if level != WORD_LEVEL {
            continue;
        }
        let text = fields.get(columns.text).map(|t| t.trim()).unwrap_or("");
        if text.is_empty() {
            continue;
        }

        let left: f64 = parse_field(&fields, columns.left, "left", line_no)?;
        let top: f64 = parse_field(&fields, columns.top, "top", line_no)?;
        let width: f64 = parse_field(&fields, columns.width, "width", line_no)?;
        let height: f64 = parse_field(&fields, columns.height, "height", line_no)?;
        let confidence: f64 = parse_field(&fields, columns.conf, "conf", line_no)?;

        words.push(TsvWord {
            bbox: BoundingBox::new(left, top, left + width, top + height),
            confidence,
            text: text.to_string(),
        });
    }
    Ok(words)
}

fn parse_field<T: std::str::FromStr>(
    fields: &[&str],
    index: usize,
    column: &'static str,
    line: usize,
) -> Result<T, TsvError> {
    let raw = fields
        .get(index)
        .map(|f| f.trim())
        .ok_or(TsvError::MissingValue { line, column })?;
    raw.parse().map_err(|_| TsvError::InvalidValue {
        line,
        column,
        value: raw.to_string(),
    })
}
