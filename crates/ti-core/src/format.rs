//! Elapsed time rendering.

use std::fmt;

/// Elapsed milliseconds rendered as `H:MM:SS`.
///
/// Hours are unpadded and unbounded; sub-second remainders are truncated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Elapsed(pub u64);

impl fmt::Display for Elapsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total_seconds = self.0 / 1000;
        let hours = total_seconds / 3600;
        let minutes = (total_seconds / 60) % 60;
        let seconds = total_seconds % 60;
        write!(f, "{hours}:{minutes:02}:{seconds:02}")
    }
}

pub fn format_elapsed(millis: u64) -> String {
    Elapsed(millis).to_string()
}
