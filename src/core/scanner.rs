use crate::core::outcome::ParseError;

const CARRIAGE_RETURN: u8 = 0x0D;
const LINE_FEED: u8 = 0x0A;
const SPACE: u8 = 0x20;
const QUOTE: u8 = 0x22;

/// Only ASCII letters count; digits and punctuation are filler.
pub fn is_alphanumeric(byte: u8) -> bool {
    byte.is_ascii_alphabetic()
}

fn is_line_end(byte: u8) -> bool {
    byte == CARRIAGE_RETURN || byte == LINE_FEED
}

fn decode(bytes: Vec<u8>) -> Result<String, ParseError> {
    String::from_utf8(bytes).map_err(|_| ParseError::InvalidEncoding)
}

/// Forward-only cursor over the raw bytes of a location file.
pub struct Scanner<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    fn next_byte(&mut self) -> Option<u8> {
        let byte = self.bytes.get(self.pos).copied()?;
        self.pos += 1;
        Some(byte)
    }

    /// Reads the next keyword. A keyword must be terminated by a space;
    /// `EndOfInput` means the stream ran out before any keyword started.
    pub fn parse_keyword(&mut self) -> Result<String, ParseError> {
        let mut byte = loop {
            match self.next_byte() {
                Some(b) if is_alphanumeric(b) => break b,
                Some(_) => continue,
                None => return Err(ParseError::EndOfInput),
            }
        };

        let mut keyword = Vec::new();
        loop {
            if byte == SPACE {
                return decode(keyword);
            }
            if is_line_end(byte) {
                break;
            }
            keyword.push(byte);
            match self.next_byte() {
                Some(b) => byte = b,
                None => break,
            }
        }

        // Lossy here: the text only ends up in the error message.
        Err(ParseError::IncompleteKeyword(
            String::from_utf8_lossy(&keyword).into_owned(),
        ))
    }

    /// Reads a double-quoted argument that must close on the same line.
    pub fn parse_string(&mut self) -> Result<String, ParseError> {
        loop {
            match self.next_byte() {
                Some(QUOTE) => break,
                Some(b) if is_alphanumeric(b) => return Err(ParseError::MissingQuote),
                Some(_) => continue,
                None => return Err(ParseError::UnexpectedEof),
            }
        }

        let mut string = Vec::new();
        loop {
            match self.next_byte() {
                Some(QUOTE) => return decode(string),
                Some(b) if is_line_end(b) => return Err(ParseError::IncompleteString),
                Some(b) => string.push(b),
                None => return Err(ParseError::IncompleteString),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_skips_filler() {
        let mut scanner = Scanner::new(b"\n\n  # 42 -- location \"Park\"");
        assert_eq!(scanner.parse_keyword().unwrap(), "location");
        assert_eq!(scanner.parse_string().unwrap(), "Park");
    }

    #[test]
    fn test_keyword_keeps_punctuation() {
        let mut scanner = Scanner::new(b"preference+ \"sun\"");
        assert_eq!(scanner.parse_keyword().unwrap(), "preference+");
    }

    #[test]
    fn test_keyword_end_of_input() {
        let mut scanner = Scanner::new(b"  \r\n 123 ");
        assert_eq!(scanner.parse_keyword(), Err(ParseError::EndOfInput));
    }

    #[test]
    fn test_keyword_incomplete() {
        let mut scanner = Scanner::new(b"location\n\"Park\"");
        assert_eq!(
            scanner.parse_keyword(),
            Err(ParseError::IncompleteKeyword("location".into()))
        );

        let mut scanner = Scanner::new(b"activ");
        assert_eq!(
            scanner.parse_keyword(),
            Err(ParseError::IncompleteKeyword("activ".into()))
        );

        let mut scanner = Scanner::new(b"name\r\n");
        assert_eq!(
            scanner.parse_keyword(),
            Err(ParseError::IncompleteKeyword("name".into()))
        );
    }

    #[test]
    fn test_string_missing_quote() {
        let mut scanner = Scanner::new(b"  Park\"");
        assert_eq!(scanner.parse_string(), Err(ParseError::MissingQuote));
    }

    #[test]
    fn test_string_eof_before_quote() {
        let mut scanner = Scanner::new(b"   ");
        assert_eq!(scanner.parse_string(), Err(ParseError::UnexpectedEof));
    }

    #[test]
    fn test_string_incomplete() {
        let mut scanner = Scanner::new(b"\"Park\n\"");
        assert_eq!(scanner.parse_string(), Err(ParseError::IncompleteString));

        let mut scanner = Scanner::new(b"\"Park");
        assert_eq!(scanner.parse_string(), Err(ParseError::IncompleteString));
    }

    #[test]
    fn test_string_has_no_escapes() {
        let mut scanner = Scanner::new(b"\"a\\b c\"");
        assert_eq!(scanner.parse_string().unwrap(), "a\\b c");
    }

    #[test]
    fn test_invalid_utf8_is_rejected() {
        let mut scanner = Scanner::new(b"\"caf\xe9\"");
        assert_eq!(scanner.parse_string(), Err(ParseError::InvalidEncoding));

        let mut scanner = Scanner::new(b"name\xff \"x\"");
        assert_eq!(scanner.parse_keyword(), Err(ParseError::InvalidEncoding));
    }

    #[test]
    fn test_utf8_string_is_kept() {
        let mut scanner = Scanner::new("\"café\"".as_bytes());
        assert_eq!(scanner.parse_string().unwrap(), "café");
    }

    #[test]
    fn test_string_closing_quote_at_end() {
        let mut scanner = Scanner::new(b"\"\"");
        assert_eq!(scanner.parse_string().unwrap(), "");
        assert_eq!(scanner.position(), 2);
    }
}
