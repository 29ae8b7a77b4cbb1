//! Human-readable run durations ("10m", "30s") to whole seconds.

use crate::error::ValidationError;

const SECONDS_PER_MINUTE: u64 = 60;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Token<'a> {
    Digits(&'a str),
    Letters(&'a str),
}

#[derive(Clone, Copy, Eq, PartialEq)]
enum Class {
    Digit,
    Letter,
}

fn classify(ch: char) -> Option<Class> {
    if ch.is_ascii_digit() {
        Some(Class::Digit)
    } else if ch.is_ascii_lowercase() {
        Some(Class::Letter)
    } else {
        None
    }
}

/// Split into maximal digit runs and lowercase letter runs; anything else
/// separates.
fn tokenize(raw: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut chars = raw.char_indices().peekable();

    while let Some((start, ch)) = chars.next() {
        let Some(class) = classify(ch) else {
            continue;
        };

        let mut end = start + ch.len_utf8();
        while let Some(&(idx, next)) = chars.peek() {
            if classify(next) != Some(class) {
                break;
            }
            end = idx + next.len_utf8();
            chars.next();
        }

        let run = &raw[start..end];
        tokens.push(match class {
            Class::Digit => Token::Digits(run),
            Class::Letter => Token::Letters(run),
        });
    }

    tokens
}

/// Parse a duration made of one integer and one unit (`s` or `m`), in either
/// order, into seconds.
pub fn parse_duration_secs(raw: &str) -> Result<u64, ValidationError> {
    let malformed = |reason: &'static str| ValidationError::MalformedDuration {
        raw: raw.to_owned(),
        reason,
    };

    let tokens = tokenize(raw);
    let [first, second] = tokens.as_slice() else {
        return Err(malformed("it should contain both a value and a unit"));
    };

    let (value, unit) = match (*first, *second) {
        (Token::Digits(value), Token::Letters(unit))
        | (Token::Letters(unit), Token::Digits(value)) => (value, unit),
        _ => return Err(malformed("it should contain both a value and a unit")),
    };

    let multiplier = match unit {
        "s" => 1,
        "m" => SECONDS_PER_MINUTE,
        _ => return Err(malformed("unit should be either 'm' or 's'")),
    };

    value
        .parse::<u64>()
        .ok()
        .and_then(|value| value.checked_mul(multiplier))
        .ok_or_else(|| malformed("value is out of range"))
}
