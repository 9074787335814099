//! Item states and their string forms.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while formatting a state with a display pattern.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    #[error("Conversion '%{conversion}' cannot format state '{state}'")]
    IllegalConversion { conversion: char, state: String },

    #[error("Unknown conversion '%{conversion}' in pattern '{pattern}'")]
    UnknownConversion { conversion: char, pattern: String },

    #[error("Pattern '{pattern}' ends with an incomplete conversion")]
    Incomplete { pattern: String },
}

/// Errors raised while parsing a state from its string form.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Cannot parse '{value}' as a {item_type} state")]
pub struct StateParseError {
    pub item_type: String,
    pub value: String,
}

/// Binary switch state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OnOff {
    On,
    Off,
}

impl OnOff {
    pub const ALL: [OnOff; 2] = [OnOff::On, OnOff::Off];

    pub fn as_str(self) -> &'static str {
        match self {
            OnOff::On => "ON",
            OnOff::Off => "OFF",
        }
    }
}

/// Contact state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OpenClosed {
    Open,
    Closed,
}

impl OpenClosed {
    pub const ALL: [OpenClosed; 2] = [OpenClosed::Open, OpenClosed::Closed];

    pub fn as_str(self) -> &'static str {
        match self {
            OpenClosed::Open => "OPEN",
            OpenClosed::Closed => "CLOSED",
        }
    }
}

/// Current state of an item.
///
/// `Null` and `Undef` are the two "undefined" sentinels: the item has never
/// received a value, or its value is currently unknown.
#[derive(Debug, Clone, PartialEq)]
pub enum State {
    Null,
    Undef,
    Text(String),
    Decimal(f64),
    OnOff(OnOff),
    OpenClosed(OpenClosed),
}

impl State {
    /// Parse a state for an item of the given type.
    ///
    /// `NULL` and `UNDEF` are accepted for every type.
    pub fn parse(item_type: &str, value: &str) -> Result<Self, StateParseError> {
        let error = || StateParseError {
            item_type: item_type.to_string(),
            value: value.to_string(),
        };

        match value {
            "NULL" => return Ok(State::Null),
            "UNDEF" => return Ok(State::Undef),
            _ => {}
        }

        match item_type {
            "Number" | "Dimmer" | "Rollershutter" => value
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(State::Decimal)
                .ok_or_else(error),
            "Switch" => match value {
                "ON" => Ok(State::OnOff(OnOff::On)),
                "OFF" => Ok(State::OnOff(OnOff::Off)),
                _ => Err(error()),
            },
            "Contact" => match value {
                "OPEN" => Ok(State::OpenClosed(OpenClosed::Open)),
                "CLOSED" => Ok(State::OpenClosed(OpenClosed::Closed)),
                _ => Err(error()),
            },
            _ => Ok(State::Text(value.to_string())),
        }
    }

    /// Whether this state is one of the undefined sentinels.
    pub fn is_undefined(&self) -> bool {
        matches!(self, State::Null | State::Undef)
    }

    pub fn as_decimal(&self) -> Option<f64> {
        match self {
            State::Decimal(value) => Some(*value),
            _ => None,
        }
    }

    /// Full string form of the state, as sent to clients.
    pub fn to_full_string(&self) -> String {
        match self {
            State::Null => "NULL".to_string(),
            State::Undef => "UNDEF".to_string(),
            State::Text(text) => text.clone(),
            State::Decimal(value) => format!("{}", value),
            State::OnOff(value) => value.as_str().to_string(),
            State::OpenClosed(value) => value.as_str().to_string(),
        }
    }

    /// Format the state with a printf-style display pattern.
    ///
    /// Supports `%s`, `%d`, `%f`, `%.Nf` and `%%`. Numeric conversions are only
    /// valid for decimal states; `%d` truncates towards zero.
    pub fn format(&self, pattern: &str) -> Result<String, FormatError> {
        let mut out = String::with_capacity(pattern.len() + 8);
        let mut chars = pattern.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '%' {
                out.push(c);
                continue;
            }

            let mut precision: Option<usize> = None;
            if chars.peek() == Some(&'.') {
                chars.next();
                let mut digits = String::new();
                while let Some(d) = chars.peek().copied().filter(char::is_ascii_digit) {
                    digits.push(d);
                    chars.next();
                }
                precision = digits.parse().ok();
            }

            let Some(conversion) = chars.next() else {
                return Err(FormatError::Incomplete {
                    pattern: pattern.to_string(),
                });
            };

            match conversion {
                '%' => out.push('%'),
                's' => out.push_str(&self.to_full_string()),
                'd' => {
                    let value = self.numeric_for(conversion)?;
                    out.push_str(&format!("{}", value.trunc() as i64));
                }
                'f' => {
                    let value = self.numeric_for(conversion)?;
                    let precision = precision.unwrap_or(6);
                    out.push_str(&format!("{:.*}", precision, value));
                }
                other => {
                    return Err(FormatError::UnknownConversion {
                        conversion: other,
                        pattern: pattern.to_string(),
                    })
                }
            }
        }

        Ok(out)
    }

    fn numeric_for(&self, conversion: char) -> Result<f64, FormatError> {
        self.as_decimal().ok_or_else(|| FormatError::IllegalConversion {
            conversion,
            state: self.to_full_string(),
        })
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_full_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_by_item_type() {
        assert_eq!(State::parse("Number", "21.5").unwrap(), State::Decimal(21.5));
        assert_eq!(State::parse("Switch", "ON").unwrap(), State::OnOff(OnOff::On));
        assert_eq!(
            State::parse("Contact", "CLOSED").unwrap(),
            State::OpenClosed(OpenClosed::Closed)
        );
        assert_eq!(
            State::parse("String", "hello").unwrap(),
            State::Text("hello".to_string())
        );
        assert_eq!(State::parse("Switch", "UNDEF").unwrap(), State::Undef);
        assert!(State::parse("Number", "warm").is_err());
        assert!(State::parse("Number", "NaN").is_err());
        assert!(State::parse("Dimmer", "inf").is_err());
        assert!(State::parse("Rollershutter", "-infinity").is_err());
        assert!(State::parse("Switch", "DIMMED").is_err());
    }

    #[test]
    fn full_string_drops_trailing_zero_fraction() {
        assert_eq!(State::Decimal(80.0).to_full_string(), "80");
        assert_eq!(State::Decimal(21.5).to_full_string(), "21.5");
        assert_eq!(State::Null.to_full_string(), "NULL");
    }

    #[test]
    fn format_decimal_patterns() {
        let state = State::Decimal(21.456);
        assert_eq!(state.format("%.1f °C").unwrap(), "21.5 °C");
        assert_eq!(state.format("%d %%").unwrap(), "21 %");
        assert_eq!(state.format("%s").unwrap(), "21.456");
    }

    #[test]
    fn format_rejects_numeric_conversion_on_text() {
        let state = State::Text("open".to_string());
        assert!(matches!(
            state.format("%.1f"),
            Err(FormatError::IllegalConversion { conversion: 'f', .. })
        ));
        assert!(matches!(
            state.format("%x"),
            Err(FormatError::UnknownConversion { conversion: 'x', .. })
        ));
        assert!(matches!(
            state.format("value %"),
            Err(FormatError::Incomplete { .. })
        ));
    }
}
