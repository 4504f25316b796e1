//! Minute-delta edits entered by the user.

use std::str::FromStr;

use thiserror::Error;

use crate::row::RowId;

const MS_PER_MINUTE: f64 = 60_000.0;

/// Rejected "+/- minutes" input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseMinutesError {
    #[error("no minutes given")]
    Empty,

    #[error("not a number of minutes: {0}")]
    NotANumber(String),

    #[error("minutes out of range: {0}")]
    OutOfRange(String),
}

/// A signed amount of time, entered in (possibly fractional) minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinuteDelta {
    millis: i64,
}

impl MinuteDelta {
    pub const fn from_millis(millis: i64) -> Self {
        Self { millis }
    }

    pub const fn millis(self) -> i64 {
        self.millis
    }
}

impl FromStr for MinuteDelta {
    type Err = ParseMinutesError;

    /// Accepts `"15"`, `"-10"`, `"+3"`, `"1.5"`. Milliseconds are truncated toward zero.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if text.is_empty() {
            return Err(ParseMinutesError::Empty);
        }

        let minutes: f64 = text
            .parse()
            .map_err(|_| ParseMinutesError::NotANumber(text.to_string()))?;
        if !minutes.is_finite() {
            return Err(ParseMinutesError::NotANumber(text.to_string()));
        }

        let millis = (minutes * MS_PER_MINUTE).trunc();
        // i64::MAX is not exactly representable; stay well inside it.
        if millis.abs() >= 9.0e18 {
            return Err(ParseMinutesError::OutOfRange(text.to_string()));
        }

        #[expect(
            clippy::cast_possible_truncation,
            reason = "range checked and truncated above"
        )]
        let millis = millis as i64;
        Ok(Self { millis })
    }
}

/// The confirmed effect of an edit dialog: add `delta` to `target`, taking it
/// from `source` when the dialog was opened by dragging one row onto another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditRequest {
    pub target: RowId,
    pub source: Option<RowId>,
    pub delta: MinuteDelta,
}

impl EditRequest {
    /// Builds a request from raw dialog text. Malformed text yields an error and
    /// the caller discards the edit.
    pub fn parse(
        target: RowId,
        source: Option<RowId>,
        minutes: &str,
    ) -> Result<Self, ParseMinutesError> {
        Ok(Self {
            target,
            source,
            delta: minutes.parse()?,
        })
    }
}
