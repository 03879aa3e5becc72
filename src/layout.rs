//! The fixed-width layout table shared by the encoder and the decoder.
//!
//! Every line starts with a one-character tag followed by its fields in
//! declared order, with no delimiters. Field offsets are always computed from
//! this table, never written out as literals elsewhere.

use crate::error::{LayoutError, Result};
use std::ops::Range;

/// Side of the column a value is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Justify {
    /// Value first, padding after. Overlong values are truncated.
    Left,
    /// Padding first, value after. Overlong values are rejected.
    Right,
}

/// One column of a layout line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub width: usize,
    pub justify: Justify,
    pub pad: char,
}

impl FieldSpec {
    const fn left(name: &'static str, width: usize, pad: char) -> Self {
        FieldSpec {
            name,
            width,
            justify: Justify::Left,
            pad,
        }
    }

    const fn right(name: &'static str, width: usize, pad: char) -> Self {
        FieldSpec {
            name,
            width,
            justify: Justify::Right,
            pad,
        }
    }

    /// Renders `value` into exactly `width` columns.
    ///
    /// Left-justified values keep their left-hand portion when too long.
    /// Right-justified values are numeric and cannot be cut, so an overlong
    /// one is an `InvalidInput` error.
    pub fn render(&self, value: &str) -> Result<String> {
        let len = value.chars().count();
        let mut out = String::with_capacity(self.width);

        match self.justify {
            Justify::Left => {
                out.extend(value.chars().take(self.width));
                out.extend(std::iter::repeat(self.pad).take(self.width.saturating_sub(len)));
            }
            Justify::Right => {
                if len > self.width {
                    return Err(LayoutError::InvalidInput {
                        field: self.name,
                        message: format!(
                            "{:?} needs {} columns but the field holds {}",
                            value, len, self.width
                        ),
                    });
                }
                out.extend(std::iter::repeat(self.pad).take(self.width - len));
                out.push_str(value);
            }
        }

        Ok(out)
    }
}

/// The full shape of one line kind: its tag and ordered columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineLayout {
    pub tag: char,
    pub fields: &'static [FieldSpec],
}

impl LineLayout {
    /// Total line width: the tag plus every field.
    pub const fn width(&self) -> usize {
        let mut total = 1;
        let mut i = 0;
        while i < self.fields.len() {
            total += self.fields[i].width;
            i += 1;
        }
        total
    }

    /// Byte offset of field `index` from the start of the line.
    pub fn offset(&self, index: usize) -> usize {
        1 + self.fields[..index].iter().map(|f| f.width).sum::<usize>()
    }

    /// Byte range of field `index`.
    pub fn range(&self, index: usize) -> Range<usize> {
        let start = self.offset(index);
        start..start + self.fields[index].width
    }

    /// Returns `true` if the line is ASCII, starts with this tag and has
    /// exactly this layout's width.
    pub fn frames(&self, line: &str) -> bool {
        line.is_ascii() && line.len() == self.width() && line.starts_with(self.tag)
    }

    /// Extracts the raw (untrimmed) text of field `index`.
    ///
    /// Returns an empty string when the line is too short; callers check
    /// [`LineLayout::frames`] first.
    pub fn slice<'a>(&self, line: &'a str, index: usize) -> &'a str {
        line.get(self.range(index)).unwrap_or("")
    }

    /// Builds a full line from one value per field, in declared order.
    pub fn compose(&self, values: &[&str]) -> Result<String> {
        debug_assert_eq!(values.len(), self.fields.len());

        let mut line = String::with_capacity(self.width());
        line.push(self.tag);
        for (spec, value) in self.fields.iter().zip(values) {
            line.push_str(&spec.render(value)?);
        }
        Ok(line)
    }
}

/// Header field indices.
pub mod header_field {
    pub const COLLEGE: usize = 0;
    pub const TAX_ID: usize = 1;
    pub const DATE: usize = 2;
}

/// Body field indices.
pub mod body_field {
    pub const DOC_NUMBER: usize = 0;
    pub const DOC_TYPE: usize = 1;
    pub const NAME: usize = 2;
    pub const JOB_TITLE: usize = 3;
    pub const FULL_PAYMENT: usize = 4;
}

/// Footer field indices.
pub mod footer_field {
    pub const BODY_COUNT: usize = 0;
}

pub const HEADER: LineLayout = LineLayout {
    tag: 'E',
    fields: &[
        FieldSpec::left("college", 30, ' '),
        FieldSpec::left("tax id", 10, ' '),
        FieldSpec::left("date", 8, '0'),
    ],
};

pub const BODY: LineLayout = LineLayout {
    tag: 'D',
    fields: &[
        FieldSpec::left("doc number", 11, ' '),
        FieldSpec::left("doc type", 1, ' '),
        FieldSpec::left("name", 50, ' '),
        FieldSpec::left("job title", 30, ' '),
        FieldSpec::right("full payment", 12, ' '),
    ],
};

pub const FOOTER: LineLayout = LineLayout {
    tag: 'S',
    fields: &[FieldSpec::right("body count", 9, '0')],
};

pub const HEADER_WIDTH: usize = HEADER.width();
pub const BODY_WIDTH: usize = BODY.width();
pub const FOOTER_WIDTH: usize = FOOTER.width();
