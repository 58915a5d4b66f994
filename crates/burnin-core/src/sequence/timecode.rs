use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::debug;

use super::field::{BoundedField, Candidate, CoerceInt};

const HOUR: BoundedField = BoundedField::new("hour", 0, 23);
const MINUTE: BoundedField = BoundedField::new("minute", 0, 59);
const SECOND: BoundedField = BoundedField::new("second", 0, 59);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimecodeError {
    #[error("{field} must be an integer, got {input}")]
    TypeConversion { field: &'static str, input: String },
    #[error("{field} must be between {lower} and {upper}, got {value}")]
    Range {
        field: &'static str,
        lower: u8,
        upper: u8,
        value: i128,
    },
    #[error("fps must be one of {allowed:?}, got {value}")]
    InvalidFps { value: i128, allowed: [u8; 5] },
    #[error("malformed timecode {text:?}, expected HH:MM:SS:FF")]
    Malformed { text: String },
}

/// Supported frame rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Fps {
    #[default]
    Fps24,
    Fps25,
    Fps30,
    Fps48,
    Fps60,
}

impl Fps {
    pub const ALL: [Fps; 5] = [Fps::Fps24, Fps::Fps25, Fps::Fps30, Fps::Fps48, Fps::Fps60];

    pub const fn as_u8(self) -> u8 {
        match self {
            Fps::Fps24 => 24,
            Fps::Fps25 => 25,
            Fps::Fps30 => 30,
            Fps::Fps48 => 48,
            Fps::Fps60 => 60,
        }
    }

    fn allowed() -> [u8; 5] {
        Self::ALL.map(Fps::as_u8)
    }

    fn check(candidate: &Candidate) -> Result<Fps, TimecodeError> {
        let value = candidate.value("fps")?;
        Self::ALL
            .into_iter()
            .find(|fps| i128::from(fps.as_u8()) == value)
            .ok_or(TimecodeError::InvalidFps {
                value,
                allowed: Self::allowed(),
            })
    }

    /// Range of the frame field at this rate. The upper bound is the rate
    /// itself, so e.g. frame 24 is accepted at 24 fps.
    fn frame_field(self) -> BoundedField {
        BoundedField::new("frame", 0, self.as_u8())
    }
}

impl fmt::Display for Fps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

/// A position in a sequence as hour:minute:second:frame at a fixed rate.
///
/// Every setter validates its input and leaves the value untouched on
/// failure. `set_frame` checks against the rate set at the time of the call;
/// a later `set_fps` does not re-check the frame. Use [`Timecode::builder`]
/// to validate the frame against the final rate instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Timecode {
    hour: u8,
    minute: u8,
    second: u8,
    frame: u8,
    fps: Fps,
}

impl Timecode {
    /// Apply the setters in order hour, minute, second, frame, fps on top of
    /// the defaults. The frame is therefore checked against 24 fps.
    pub fn new(
        hour: impl CoerceInt,
        minute: impl CoerceInt,
        second: impl CoerceInt,
        frame: impl CoerceInt,
        fps: impl CoerceInt,
    ) -> Result<Self, TimecodeError> {
        let mut tc = Timecode::default();
        tc.set_hour(hour)?;
        tc.set_minute(minute)?;
        tc.set_second(second)?;
        tc.set_frame(frame)?;
        tc.set_fps(fps)?;
        Ok(tc)
    }

    pub fn builder() -> TimecodeBuilder {
        TimecodeBuilder::default()
    }

    /// Parse `HH:MM:SS:FF` at the given rate.
    pub fn parse(text: &str, fps: impl CoerceInt) -> Result<Self, TimecodeError> {
        let parts: Vec<&str> = text.trim().split(':').collect();
        let [hour, minute, second, frame] = parts.as_slice() else {
            return Err(TimecodeError::Malformed {
                text: text.to_string(),
            });
        };
        Timecode::builder()
            .hour(*hour)
            .minute(*minute)
            .second(*second)
            .frame(*frame)
            .fps(fps)
            .build()
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn second(&self) -> u8 {
        self.second
    }

    pub fn frame(&self) -> u8 {
        self.frame
    }

    pub fn fps(&self) -> Fps {
        self.fps
    }

    pub fn set_hour(&mut self, hour: impl CoerceInt) -> Result<(), TimecodeError> {
        self.hour = HOUR.validate(&hour)?;
        Ok(())
    }

    pub fn set_minute(&mut self, minute: impl CoerceInt) -> Result<(), TimecodeError> {
        self.minute = MINUTE.validate(&minute)?;
        Ok(())
    }

    pub fn set_second(&mut self, second: impl CoerceInt) -> Result<(), TimecodeError> {
        self.second = SECOND.validate(&second)?;
        Ok(())
    }

    pub fn set_frame(&mut self, frame: impl CoerceInt) -> Result<(), TimecodeError> {
        self.frame = self.fps.frame_field().validate(&frame)?;
        Ok(())
    }

    pub fn set_fps(&mut self, fps: impl CoerceInt) -> Result<(), TimecodeError> {
        let fps = Fps::check(&Candidate::of(&fps))?;
        if self.frame > fps.as_u8() {
            debug!(
                frame = self.frame,
                %fps,
                "frame exceeds new fps, keeping it as set"
            );
        }
        self.fps = fps;
        Ok(())
    }
}

impl fmt::Display for Timecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}:{:02}",
            self.hour, self.minute, self.second, self.frame
        )
    }
}

impl FromStr for Timecode {
    type Err = TimecodeError;

    /// Parse `HH:MM:SS:FF` at the default 24 fps.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Timecode::parse(s, Fps::default().as_u8())
    }
}

/// Collects candidate fields and validates them together.
///
/// The rate is resolved first so the frame is checked against the rate the
/// finished timecode will carry. Unset fields take the defaults.
#[derive(Debug, Clone, Default)]
pub struct TimecodeBuilder {
    hour: Option<Candidate>,
    minute: Option<Candidate>,
    second: Option<Candidate>,
    frame: Option<Candidate>,
    fps: Option<Candidate>,
}

impl TimecodeBuilder {
    pub fn hour(mut self, hour: impl CoerceInt) -> Self {
        self.hour = Some(Candidate::of(&hour));
        self
    }

    pub fn minute(mut self, minute: impl CoerceInt) -> Self {
        self.minute = Some(Candidate::of(&minute));
        self
    }

    pub fn second(mut self, second: impl CoerceInt) -> Self {
        self.second = Some(Candidate::of(&second));
        self
    }

    pub fn frame(mut self, frame: impl CoerceInt) -> Self {
        self.frame = Some(Candidate::of(&frame));
        self
    }

    pub fn fps(mut self, fps: impl CoerceInt) -> Self {
        self.fps = Some(Candidate::of(&fps));
        self
    }

    pub fn build(self) -> Result<Timecode, TimecodeError> {
        let fps = match &self.fps {
            Some(c) => Fps::check(c)?,
            None => Fps::default(),
        };
        let field = |candidate: &Option<Candidate>, bounds: BoundedField| match candidate {
            Some(c) => bounds.check(c),
            None => Ok(0),
        };
        Ok(Timecode {
            hour: field(&self.hour, HOUR)?,
            minute: field(&self.minute, MINUTE)?,
            second: field(&self.second, SECOND)?,
            frame: field(&self.frame, fps.frame_field())?,
            fps,
        })
    }
}
