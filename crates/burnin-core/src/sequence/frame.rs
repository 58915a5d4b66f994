use std::fmt;

use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("frame number {frame_num} with offset {offset} is not positive")]
    NonPositive { frame_num: i64, offset: i64 },
    #[error("missing required field {0:?}")]
    MissingField(&'static str),
    #[error("field {field:?} has invalid value {value}")]
    InvalidField { field: &'static str, value: String },
}

/// A frame counter as shown on a burn-in: number plus display offset,
/// zero-padded to a minimum width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Frame {
    frame_num: i64,
    offset: i64,
    padding: usize,
}

impl Frame {
    pub const DEFAULT_PADDING: usize = 4;

    pub fn new(frame_num: i64, offset: i64, padding: usize) -> Result<Self, FrameError> {
        if i128::from(frame_num) + i128::from(offset) <= 0 {
            return Err(FrameError::NonPositive { frame_num, offset });
        }
        Ok(Self {
            frame_num,
            offset,
            padding,
        })
    }

    /// Frame with no offset and the default padding.
    pub fn numbered(frame_num: i64) -> Result<Self, FrameError> {
        Self::new(frame_num, 0, Self::DEFAULT_PADDING)
    }

    /// Build from a mapping with a required `number` key and optional
    /// `offset` and `padding` keys. Other keys are ignored.
    pub fn from_mapping(data: &Map<String, Value>) -> Result<Self, FrameError> {
        let number = data
            .get("number")
            .ok_or(FrameError::MissingField("number"))?;
        let frame_num = integer_field("number", number)?;
        let offset = data
            .get("offset")
            .map(|v| integer_field("offset", v))
            .transpose()?
            .unwrap_or(0);
        let padding = data
            .get("padding")
            .map(|v| {
                v.as_u64()
                    .and_then(|p| usize::try_from(p).ok())
                    .ok_or_else(|| invalid("padding", v))
            })
            .transpose()?
            .unwrap_or(Self::DEFAULT_PADDING);
        Self::new(frame_num, offset, padding)
    }

    pub fn frame_num(&self) -> i64 {
        self.frame_num
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    pub fn padding(&self) -> usize {
        self.padding
    }

    /// The displayed number, `frame_num + offset`. Always positive.
    pub fn number(&self) -> i128 {
        i128::from(self.frame_num) + i128::from(self.offset)
    }

    /// Zero-padded to at least `padding` digits, never truncated.
    pub fn to_display_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.number().to_string();
        let fill = self.padding.saturating_sub(digits.len());
        write!(f, "{}{digits}", "0".repeat(fill))
    }
}

fn integer_field(field: &'static str, value: &Value) -> Result<i64, FrameError> {
    value.as_i64().ok_or_else(|| invalid(field, value))
}

fn invalid(field: &'static str, value: &Value) -> FrameError {
    FrameError::InvalidField {
        field,
        value: value.to_string(),
    }
}
