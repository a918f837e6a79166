//! Tag string handling.

use crate::core::BufStream;
use std::error;
use std::fmt::{self, Display, Formatter};

/// The text encodings that can appear in tag data.
///
/// ID3v2 declares one of these with a selector byte at the start of every textual frame,
/// while ID3v1 is implicitly [`Latin1`](Encoding::Latin1).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Encoding {
    /// ISO-8859-1, also known as Latin1. Every byte maps directly onto the code-point of
    /// the same value.
    Latin1,
    /// UTF-16 with a leading BOM that determines the endianness of the rest of the data.
    Utf16,
    /// UTF-16BE with no BOM.
    Utf16Be,
    /// UTF-8.
    Utf8,
}

impl Encoding {
    /// The width of the NUL terminator in this encoding.
    pub fn nul_size(&self) -> usize {
        match self {
            Self::Utf8 | Self::Latin1 => 1,
            _ => 2,
        }
    }
}

impl Default for Encoding {
    fn default() -> Self {
        Self::Utf8
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DecodeError {
    /// A UTF-16 string did not start with `FF FE` or `FE FF`.
    MalformedBom,
    /// A terminated string ran to the end of its data without a terminator.
    UnexpectedEof,
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::MalformedBom => write![f, "malformed UTF-16 byte order mark"],
            Self::UnexpectedEof => write![f, "unexpected end of data inside a terminated string"],
        }
    }
}

impl error::Error for DecodeError {}

/// Decodes everything left in `stream`.
pub(crate) fn read(encoding: Encoding, stream: &mut BufStream) -> Result<String, DecodeError> {
    decode(encoding, stream.take_rest())
}

/// Decodes a string up to its NUL terminator, which is consumed but not included. A missing
/// terminator is an error.
pub(crate) fn read_terminated(
    encoding: Encoding,
    stream: &mut BufStream,
) -> Result<String, DecodeError> {
    // The terminator is 0x00 in Latin1/UTF-8 and 0x0000 in UTF-16. UTF-16 is searched
    // in whole code units, so that a zero high byte followed by a zero low byte is not
    // confused with a terminator.
    let string_data = match encoding.nul_size() {
        1 => stream.search(&[0]),
        _ => stream.search(&[0, 0]),
    }
    .map_err(|_| DecodeError::UnexpectedEof)?;

    decode(encoding, string_data)
}

/// Decodes `data` according to the encoding, stripping any trailing NULs from the result.
pub fn decode(encoding: Encoding, data: &[u8]) -> Result<String, DecodeError> {
    let string = match encoding {
        Encoding::Latin1 => decode_latin1(data),
        Encoding::Utf16 => decode_utf16(data)?,
        Encoding::Utf16Be => decode_units(data, u16::from_be_bytes),
        Encoding::Utf8 => String::from_utf8_lossy(data).to_string(),
    };

    // Taggers often terminate strings that are not required to be terminated.
    Ok(string.trim_end_matches('\0').to_string())
}

pub fn decode_latin1(data: &[u8]) -> String {
    // Latin-1 maps directly onto the first 256 code points.
    data.iter().copied().map(char::from).collect()
}

fn decode_utf16(data: &[u8]) -> Result<String, DecodeError> {
    // An empty string is allowed to omit the BOM entirely.
    if data.is_empty() {
        return Ok(String::new());
    }

    if data.len() < 2 {
        return Err(DecodeError::MalformedBom);
    }

    match (data[0], data[1]) {
        (0xFF, 0xFE) => Ok(decode_units(&data[2..], u16::from_le_bytes)),
        (0xFE, 0xFF) => Ok(decode_units(&data[2..], u16::from_be_bytes)),
        _ => Err(DecodeError::MalformedBom),
    }
}

/// Decodes UTF-16 code units with the given byte order. A dangling odd byte is dropped.
fn decode_units(data: &[u8], unit: fn([u8; 2]) -> u16) -> String {
    let units: Vec<u16> = data
        .chunks_exact(2)
        .map(|pair| unit([pair[0], pair[1]]))
        .collect();

    String::from_utf16_lossy(&units)
}

#[cfg(test)]
mod tests {
    use super::*;

    const STR_LATIN1: &str = "L\u{ee}ke \u{e2} while loop w\u{ef}th n\u{f8} escap\u{ea}";
    const STR_UNICODE: &str = "\u{2551} L\u{ee}ke \u{e2} \u{1d568}\u{1d559}\u{1d55a}le l\u{1d490}\u{1d490}p w\u{ef}th n\u{f8} escap\u{ea} \u{2551}";

    const DATA_LATIN1: &[u8] = b"L\xEEke \xE2 while loop w\xEFth n\xF8 escap\xEA";

    const DATA_UTF16: &[u8] = b"\xFF\xFE\x51\x25\x20\x00\x4c\x00\xee\x00\x6b\x00\x65\x00\x20\x00\
                                \xe2\x00\x20\x00\x35\xd8\x68\xdd\x35\xd8\x59\xdd\x35\xd8\x5a\xdd\
                                \x6c\x00\x65\x00\x20\x00\x6c\x00\x35\xd8\x90\xdc\x35\xd8\x90\xdc\
                                \x70\x00\x20\x00\x77\x00\xef\x00\x74\x00\x68\x00\x20\x00\x6e\x00\
                                \xf8\x00\x20\x00\x65\x00\x73\x00\x63\x00\x61\x00\x70\x00\xea\x00\
                                \x20\x00\x51\x25";

    const DATA_UTF16BE: &[u8] = b"\x25\x51\x00\x20\x00\x4c\x00\xee\x00\x6b\x00\x65\x00\x20\x00\xe2\
                                  \x00\x20\xd8\x35\xdd\x68\xd8\x35\xdd\x59\xd8\x35\xdd\x5a\x00\x6c\
                                  \x00\x65\x00\x20\x00\x6c\xd8\x35\xdc\x90\xd8\x35\xdc\x90\x00\x70\
                                  \x00\x20\x00\x77\x00\xef\x00\x74\x00\x68\x00\x20\x00\x6e\x00\xf8\
                                  \x00\x20\x00\x65\x00\x73\x00\x63\x00\x61\x00\x70\x00\xea\x00\x20\
                                  \x25\x51";

    const DATA_UTF8: &[u8] = b"\xe2\x95\x91\x20\x4c\xc3\xae\x6b\x65\x20\xc3\xa2\x20\xf0\x9d\x95\
                               \xa8\xf0\x9d\x95\x99\xf0\x9d\x95\x9a\x6c\x65\x20\x6c\xf0\x9d\x92\
                               \x90\xf0\x9d\x92\x90\x70\x20\x77\xc3\xaf\x74\x68\x20\x6e\xc3\xb8\
                               \x20\x65\x73\x63\x61\x70\xc3\xaa\x20\xe2\x95\x91";

    #[test]
    fn parse_latin1() {
        assert_eq!(decode(Encoding::Latin1, DATA_LATIN1).unwrap(), STR_LATIN1);
    }

    #[test]
    fn parse_utf16() {
        assert_eq!(decode(Encoding::Utf16, DATA_UTF16).unwrap(), STR_UNICODE);
        assert_eq!(decode(Encoding::Utf16, b"\xFF\xFE\x48\x00\x69\x00").unwrap(), "Hi");
        assert_eq!(decode(Encoding::Utf16, b"\xFE\xFF\x00\x48\x00\x69").unwrap(), "Hi");
    }

    #[test]
    fn parse_utf16be() {
        assert_eq!(decode(Encoding::Utf16Be, DATA_UTF16BE).unwrap(), STR_UNICODE);
    }

    #[test]
    fn parse_utf8() {
        assert_eq!(decode(Encoding::Utf8, DATA_UTF8).unwrap(), STR_UNICODE)
    }

    #[test]
    fn parse_bad_bom() {
        assert_eq!(
            decode(Encoding::Utf16, b"\x48\x00\x69\x00"),
            Err(DecodeError::MalformedBom)
        );
        assert_eq!(decode(Encoding::Utf16, b"\xFF"), Err(DecodeError::MalformedBom));
        assert_eq!(decode(Encoding::Utf16, b"").unwrap(), "");
    }

    #[test]
    fn strip_trailing_nuls() {
        assert_eq!(decode(Encoding::Latin1, b"Title\0\0\0").unwrap(), "Title");
        assert_eq!(decode(Encoding::Utf16Be, b"\x00\x48\x00\x69\x00\x00").unwrap(), "Hi");
    }

    #[test]
    fn parse_terminated() {
        let data = b"L\xEEke \xE2 while loo\0p w\xEFth n\xF8 escap\xEA";
        let mut stream = BufStream::new(data);

        let terminated = read_terminated(Encoding::Latin1, &mut stream).unwrap();
        assert_eq!(terminated, "L\u{ee}ke \u{e2} while loo");

        let rest = read(Encoding::Latin1, &mut stream).unwrap();
        assert_eq!(rest, "p w\u{ef}th n\u{f8} escap\u{ea}");
    }

    #[test]
    fn parse_terminated_utf16() {
        let data = b"\xFF\xFE\x51\x25\x20\x00\x4c\x00\0\0\
                     \xFF\xFE\x70\x00\x20\x00\x51\x25";

        let mut stream = BufStream::new(data);

        let terminated = read_terminated(Encoding::Utf16, &mut stream).unwrap();
        assert_eq!(terminated, "\u{2551} L");

        let rest = read(Encoding::Utf16, &mut stream).unwrap();
        assert_eq!(rest, "p \u{2551}");
    }

    #[test]
    fn parse_unterminated() {
        let mut stream = BufStream::new(b"no terminator here");

        assert_eq!(
            read_terminated(Encoding::Utf8, &mut stream),
            Err(DecodeError::UnexpectedEof)
        );
    }
}
