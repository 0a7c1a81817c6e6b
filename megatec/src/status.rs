//! Decoding of the Q1 status line.

use std::str::FromStr;

use crate::error::ParseError;

const HEADER: char = '(';
const TRAILER: char = ')';

/// Number of whitespace-separated fields in a status line.
const FIELD_COUNT: usize = 8;

/// Longest status/error code the device reports.
pub const MAX_CODE_LEN: usize = 15;

/// One decoded UPS status report.
///
/// Numeric fields carry whatever the device reported; no range checking
/// is done here. A value like -999.9 V is structurally valid and it is
/// up to the consumer to decide whether it is sane.
#[derive(Debug, Clone, PartialEq)]
pub struct UpsStatus {
    pub input_voltage: f32,
    pub output_voltage: f32,
    pub battery_voltage: f32,
    pub load: f32,
    pub frequency: f32,
    /// Battery/buzzer/AVR indicator.
    pub avr: f32,
    pub temperature: f32,
    /// Status or error code token, at most [`MAX_CODE_LEN`] bytes.
    pub error_code: String,
}

impl UpsStatus {
    /// Decode an assembled response message.
    ///
    /// The message may still carry the NUL frame terminator (and
    /// anything after it); decoding stops at the first NUL. Trailing
    /// CR/LF after the closing parenthesis is tolerated.
    pub fn parse(message: &[u8]) -> Result<Self, ParseError> {
        let end = message
            .iter()
            .position(|&byte| byte == 0)
            .unwrap_or(message.len());
        let text = std::str::from_utf8(&message[..end])?;
        text.trim_end().parse()
    }
}

impl FromStr for UpsStatus {
    type Err = ParseError;

    /// Parse the textual status line `(<7 floats> <code>)`.
    ///
    /// Parsing is positional and strict: exactly eight fields, each
    /// valid, or the whole parse fails. No partial record is ever
    /// produced.
    fn from_str(line: &str) -> Result<Self, ParseError> {
        let inner = line.strip_prefix(HEADER).ok_or(ParseError::MissingHeader)?;
        let inner = inner
            .strip_suffix(TRAILER)
            .ok_or(ParseError::MissingTrailer)?;

        let parts: Vec<&str> = inner.split_whitespace().collect();

        let mut fields = [0.0f32; FIELD_COUNT - 1];
        let mut parsed_count = 0;
        for (slot, token) in fields.iter_mut().zip(parts.iter()) {
            match token.parse() {
                Ok(value) => {
                    *slot = value;
                    parsed_count += 1;
                }
                Err(_) => break,
            }
        }
        if parsed_count == FIELD_COUNT - 1 {
            if let Some(code) = parts.get(FIELD_COUNT - 1) {
                if code.len() <= MAX_CODE_LEN {
                    parsed_count += 1;
                }
            }
        }
        if parsed_count != FIELD_COUNT || parts.len() != FIELD_COUNT {
            return Err(ParseError::MalformedMessage { parsed_count });
        }

        Ok(UpsStatus {
            input_voltage: fields[0],
            output_voltage: fields[1],
            battery_voltage: fields[2],
            load: fields[3],
            frequency: fields[4],
            avr: fields[5],
            temperature: fields[6],
            error_code: parts[FIELD_COUNT - 1].to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_complete_status_line() {
        let status = UpsStatus::parse(b"(230.0 230.0 13.5 25.0 50.0 0.00 35.0 00)\0").unwrap();
        assert_eq!(status.input_voltage, 230.0);
        assert_eq!(status.output_voltage, 230.0);
        assert_eq!(status.battery_voltage, 13.5);
        assert_eq!(status.load, 25.0);
        assert_eq!(status.frequency, 50.0);
        assert_eq!(status.avr, 0.00);
        assert_eq!(status.temperature, 35.0);
        assert_eq!(status.error_code, "00");
    }

    #[test]
    fn parse_is_pure_and_idempotent() {
        let message = b"(230.0 230.0 13.5 25.0 50.0 0.00 35.0 00)\0";
        assert_eq!(
            UpsStatus::parse(message).unwrap(),
            UpsStatus::parse(message).unwrap()
        );
        let bad = b"(230.0 230.0 13.5)\0";
        assert_eq!(
            UpsStatus::parse(bad).unwrap_err(),
            UpsStatus::parse(bad).unwrap_err()
        );
    }

    #[test]
    fn too_few_fields_reports_how_many_parsed() {
        assert_eq!(
            UpsStatus::parse(b"(230.0 230.0 13.5)\0").unwrap_err(),
            ParseError::MalformedMessage { parsed_count: 3 }
        );
    }

    #[test]
    fn non_numeric_field_stops_the_count() {
        // Valid fields after the bad one must not be counted.
        assert_eq!(
            UpsStatus::parse(b"(230.0 oops 13.5 25.0 50.0 0.00 35.0 00)\0").unwrap_err(),
            ParseError::MalformedMessage { parsed_count: 1 }
        );
    }

    #[test]
    fn extra_fields_are_rejected() {
        assert_eq!(
            UpsStatus::parse(b"(230.0 230.0 13.5 25.0 50.0 0.00 35.0 00 99)\0").unwrap_err(),
            ParseError::MalformedMessage { parsed_count: 8 }
        );
    }

    #[test]
    fn overlong_code_is_rejected() {
        assert_eq!(
            UpsStatus::parse(b"(230.0 230.0 13.5 25.0 50.0 0.00 35.0 0123456789ABCDEF)\0")
                .unwrap_err(),
            ParseError::MalformedMessage { parsed_count: 7 }
        );
    }

    #[test]
    fn code_at_the_length_bound_is_accepted() {
        let status =
            UpsStatus::parse(b"(230.0 230.0 13.5 25.0 50.0 0.00 35.0 0123456789ABCDE)\0").unwrap();
        assert_eq!(status.error_code.len(), MAX_CODE_LEN);
    }

    #[test]
    fn signed_and_integral_numbers_are_valid() {
        let status = UpsStatus::parse(b"(-230.0 230 13.5 25.0 50.0 0.00 -35.5 EE)\0").unwrap();
        assert_eq!(status.input_voltage, -230.0);
        assert_eq!(status.output_voltage, 230.0);
        assert_eq!(status.temperature, -35.5);
    }

    #[test]
    fn missing_header_is_rejected() {
        assert_eq!(
            UpsStatus::parse(b"230.0 230.0 13.5 25.0 50.0 0.00 35.0 00)\0").unwrap_err(),
            ParseError::MissingHeader
        );
    }

    #[test]
    fn missing_trailer_is_rejected() {
        assert_eq!(
            UpsStatus::parse(b"(230.0 230.0 13.5 25.0 50.0 0.00 35.0 00\0").unwrap_err(),
            ParseError::MissingTrailer
        );
    }

    #[test]
    fn empty_message_is_rejected() {
        assert_eq!(UpsStatus::parse(b"\0").unwrap_err(), ParseError::MissingHeader);
        assert_eq!(UpsStatus::parse(b"").unwrap_err(), ParseError::MissingHeader);
    }

    #[test]
    fn non_utf8_message_is_rejected() {
        assert!(matches!(
            UpsStatus::parse(b"(\xFF\xFE)\0").unwrap_err(),
            ParseError::NotText(_)
        ));
    }

    #[test]
    fn bytes_after_the_terminator_are_ignored() {
        let status =
            UpsStatus::parse(b"(230.0 230.0 13.5 25.0 50.0 0.00 35.0 00)\0garbage").unwrap();
        assert_eq!(status.error_code, "00");
    }

    #[test]
    fn trailing_carriage_return_is_tolerated() {
        let status =
            UpsStatus::parse(b"(230.0 230.0 13.5 25.0 50.0 0.00 35.0 00)\r\n\0").unwrap();
        assert_eq!(status.temperature, 35.0);
    }
}
