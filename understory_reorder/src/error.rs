// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors produced while reading list configuration.

use core::fmt;

/// Why an animation duration string could not be read.
///
/// Returned by [`AnimationDuration::from_str`](core::str::FromStr::from_str)
/// for [`AnimationDuration`](crate::animation::AnimationDuration).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DurationParseError {
    /// The input was empty or only whitespace.
    Empty,
    /// The input does not start with a decimal number.
    Invalid,
    /// The number is negative.
    Negative,
    /// The number is infinite, NaN, or too large to represent.
    NonFinite,
}

impl fmt::Display for DurationParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::Empty => "empty duration",
            Self::Invalid => "duration is not a number",
            Self::Negative => "duration is negative",
            Self::NonFinite => "duration is not finite",
        };
        f.write_str(msg)
    }
}

impl core::error::Error for DurationParseError {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn messages_are_lowercase_phrases() {
        assert_eq!(DurationParseError::Empty.to_string(), "empty duration");
        assert_eq!(
            DurationParseError::Invalid.to_string(),
            "duration is not a number"
        );
    }
}
