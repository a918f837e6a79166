//! Comments frames.

use crate::core::BufStream;
use crate::id3v2::frames::encoding;
use crate::id3v2::ParseResult;
use crate::string;

/// Parses a COMM frame into its text. The language and short description are read past
/// and dropped.
pub(crate) fn parse_comment(stream: &mut BufStream) -> ParseResult<String> {
    let encoding = encoding::parse(stream)?;
    let _lang: [u8; 3] = stream.read_array()?;
    let _desc = string::read_terminated(encoding, stream)?;

    Ok(string::read(encoding, stream)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id3v2::ParseError;

    const COMM_DATA: &[u8] = b"\x03\
                               eng\
                               Description\x00\
                               Text";

    #[test]
    fn parse_comm() {
        assert_eq!(parse_comment(&mut BufStream::new(COMM_DATA)).unwrap(), "Text");
    }

    #[test]
    fn parse_utf16_comm() {
        let data = b"\x01\
                     eng\
                     \xFF\xFE\x00\x00\
                     \xFE\xFF\x00\x4E\x00\x6F\x00\x74\x00\x65\x00\x00";

        assert_eq!(parse_comment(&mut BufStream::new(data)).unwrap(), "Note");
    }

    #[test]
    fn parse_truncated_comm() {
        assert!(matches!(
            parse_comment(&mut BufStream::new(b"\x00en")),
            Err(ParseError::UnexpectedEof)
        ));

        assert!(matches!(
            parse_comment(&mut BufStream::new(b"\x00engDescription")),
            Err(ParseError::UnexpectedEof)
        ));
    }
}
