//! Frame scanning and decoding.
//!
//! An ID3v2 tag body is a run of frames, each made up of a short alphanumeric ID, a size,
//! (in v2.3 and v2.4) a set of flags, and then the frame data. The scanner walks the body
//! frame by frame, while the decoders in the submodules turn the data of the frames we
//! care about into strings.
//!
//! Taggers are rarely faithful to the layout. Padding is frequently written between frames
//! instead of after them, and some frames are simply corrupted. Whenever a frame ID is not
//! valid, the scanner slides forward a byte at a time until it finds one or runs out of
//! data, which recovers alignment without throwing away the rest of the tag.

mod comments;
mod encoding;
mod text;

use crate::core::BufStream;
use crate::id3v2::frame_map::FrameMap;
use crate::id3v2::header::TagHeader;
use crate::id3v2::options::{FrameErrorPolicy, ParseOptions};
use crate::id3v2::{compat, syncdata, ParseError, ParseResult};
use crate::string;
use log::{info, warn};
use regex::bytes::Regex;
use std::borrow::Cow;
use std::fmt::{self, Display, Formatter};
use std::str;
use std::sync::OnceLock;

use text::UserText;

/// A validated frame ID.
///
/// ID3v2.2 IDs are 3 characters long and are upgraded to their 4-character equivalent
/// when one exists. IDs with no equivalent keep their original 3 characters.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Ord, PartialOrd)]
pub struct FrameId(String);

impl FrameId {
    /// Validates `raw` as a frame ID, being one or more uppercase ASCII letters or digits
    /// followed by any number of NULs. The NULs are not included in the ID.
    pub fn parse(raw: &[u8]) -> Option<Self> {
        if !is_frame_id(raw) {
            return None;
        }

        let end = raw.iter().position(|&ch| ch == 0).unwrap_or(raw.len());

        // The pattern only admits ASCII, so this will always succeed.
        str::from_utf8(&raw[..end])
            .ok()
            .map(|id| Self(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn upgrade_v2(self) -> Self {
        match compat::upgrade_v2_id(&self.0) {
            Some(v3_id) => Self(v3_id.to_string()),
            None => {
                info!(target: "id3v2", "no ID3v2.3 equivalent for frame {}", self);
                self
            }
        }
    }
}

impl Display for FrameId {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write![f, "{}", self.0]
    }
}

impl PartialEq<str> for FrameId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for FrameId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

fn is_frame_id(raw: &[u8]) -> bool {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();

    PATTERN
        .get_or_init(|| Regex::new(r"(?-u)^[A-Z0-9]+\x00*$").ok())
        .as_ref()
        .map_or(false, |pattern| pattern.is_match(raw))
}

/// The frame flags that affect decoding, normalized across versions.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
struct FrameFlags {
    grouping: bool,
    compressed: bool,
    encrypted: bool,
    unsync: bool,
    data_len: bool,
}

impl FrameFlags {
    fn parse(major: u8, flags: u16) -> Self {
        match major {
            // v2.3 compression implies a 4-byte decompressed size field, which is handled
            // the same way as the v2.4 data length indicator.
            3 => FrameFlags {
                grouping: flags & 0x0020 != 0,
                compressed: flags & 0x0080 != 0,
                encrypted: flags & 0x0040 != 0,
                unsync: false,
                data_len: flags & 0x0080 != 0,
            },

            4 => FrameFlags {
                grouping: flags & 0x0040 != 0,
                compressed: flags & 0x0008 != 0,
                encrypted: flags & 0x0004 != 0,
                unsync: flags & 0x0002 != 0,
                data_len: flags & 0x0001 != 0,
            },

            _ => FrameFlags::default(),
        }
    }
}

/// A frame as it exists in the tag, before its data is decoded.
struct RawFrame<'a> {
    id: FrameId,
    flags: FrameFlags,
    data: &'a [u8],
}

/// What a frame decodes into.
enum FrameBody {
    Value(String),
    User(UserText),
    Skipped,
}

/// Scans the frame region of a tag. TXXX frames with a known description are applied
/// after every other frame, so they always take precedence over a built-in frame.
pub(crate) fn scan(
    header: &TagHeader,
    region: &[u8],
    options: &ParseOptions,
) -> ParseResult<FrameMap> {
    let mut stream = BufStream::new(region);
    let mut frames = FrameMap::new();
    let mut user_frames = Vec::new();

    while let Some(frame) = next_frame(header, &mut stream)? {
        match decode_frame(header, &frame, options) {
            Ok(FrameBody::Value(value)) => frames.insert(frame.id.as_str(), value),
            Ok(FrameBody::User(user)) => user_frames.push(user),
            Ok(FrameBody::Skipped) => {}
            Err(err) => match options.frame_errors {
                FrameErrorPolicy::Abort => return Err(err),
                FrameErrorPolicy::Skip => {
                    warn!(target: "id3v2", "skipping malformed frame {}: {}", frame.id, err)
                }
            },
        }
    }

    for user in user_frames {
        frames.insert(user.id, user.value);
    }

    Ok(frames)
}

fn next_frame<'a>(
    header: &TagHeader,
    stream: &mut BufStream<'a>,
) -> ParseResult<Option<RawFrame<'a>>> {
    let major = header.major();

    let id = match next_id(major, stream)? {
        Some(id) if major == 2 => id.upgrade_v2(),
        Some(id) => id,
        None => return Ok(None),
    };

    let (mut size, flags) = match major {
        2 => {
            let size = stream.read_array::<3>()?;
            (u32::from_be_bytes([0, size[0], size[1], size[2]]), 0)
        }
        3 => (stream.read_u32()?, stream.read_u16()?),
        _ => (syncdata::read_u28(stream)?, stream.read_u16()?),
    };

    let flags = FrameFlags::parse(major, flags);

    // Encryption is usually vendor-specific, so there is nothing we can do with it.
    if flags.encrypted {
        return Err(ParseError::FrameEncryptionUnsupported(id));
    }

    if flags.grouping {
        stream.skip(1)?;
        size = size.checked_sub(1).ok_or(ParseError::UnexpectedEof)?;
    }

    // The final length of the data is of no use to us, as we always have the whole
    // frame in memory.
    if flags.data_len {
        stream.skip(4)?;
        size = size.checked_sub(4).ok_or(ParseError::UnexpectedEof)?;
    }

    let data = stream.slice(size as usize)?;

    Ok(Some(RawFrame { id, flags, data }))
}

/// Reads the next valid frame ID, sliding over any padding or garbage in front of it.
/// Returns `None` once the stream is exhausted.
fn next_id(major: u8, stream: &mut BufStream) -> ParseResult<Option<FrameId>> {
    let width = if major == 2 { 3 } else { 4 };
    let start = stream.pos();

    loop {
        let window = match stream.peek(width) {
            Ok(window) => window,
            Err(_) => {
                if stream.pos() > start {
                    info!(target: "id3v2", "reached end of tag after {} bytes of padding", stream.pos() - start);
                }

                stream.take_rest();
                return Ok(None);
            }
        };

        if let Some(id) = FrameId::parse(window) {
            if stream.pos() > start {
                info!(target: "id3v2", "skipped {} bytes of padding before frame {}", stream.pos() - start, id);
            }

            stream.skip(width)?;
            return Ok(Some(id));
        }

        stream.skip(1)?;
    }
}

/// Frames that only hold binary data, which is never exposed.
const SKIPPED_FRAMES: &[&str] = &["APIC", "PIC", "PRIV"];

fn decode_frame(
    header: &TagHeader,
    frame: &RawFrame,
    options: &ParseOptions,
) -> ParseResult<FrameBody> {
    if frame.data.is_empty() {
        info!(target: "id3v2", "dropping empty frame {}", frame.id);
        return Ok(FrameBody::Skipped);
    }

    if SKIPPED_FRAMES.contains(&frame.id.as_str()) {
        return Ok(FrameBody::Skipped);
    }

    let mut data = Cow::Borrowed(frame.data);

    // Writers unsynchronise after compressing, so this has to be undone first.
    if header.flags().unsync || frame.flags.unsync {
        data = Cow::Owned(syncdata::decode(&data));
    }

    if frame.flags.compressed {
        let inflated = options.inflater.inflate(&data).map_err(|err| {
            warn!(target: "id3v2", "could not decompress frame {}: {}", frame.id, err);
            ParseError::Decompress(err)
        })?;

        data = Cow::Owned(inflated);
    }

    decode_body(&frame.id, &data)
}

fn decode_body(id: &FrameId, data: &[u8]) -> ParseResult<FrameBody> {
    let mut stream = BufStream::new(data);

    let body = match id.as_str() {
        "TXXX" => match text::parse_user_text(&mut stream)? {
            Some(user) => FrameBody::User(user),
            None => FrameBody::Skipped,
        },

        _ if id.as_str().starts_with('T') => FrameBody::Value(text::parse_text(&mut stream)?),

        "COMM" => FrameBody::Value(comments::parse_comment(&mut stream)?),

        // Anything else is kept byte-for-byte, with no regard for its encoding.
        _ => FrameBody::Value(string::decode_latin1(data)),
    };

    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(major: u8, flags: u8) -> TagHeader {
        TagHeader::parse([b'I', b'D', b'3', major, 0, flags, 0, 0, 0, 0]).unwrap()
    }

    #[test]
    fn parse_frame_ids() {
        assert_eq!(FrameId::parse(b"TIT2").unwrap(), "TIT2");
        assert_eq!(FrameId::parse(b"TT2").unwrap(), "TT2");
        assert_eq!(FrameId::parse(b"TYE\0").unwrap(), "TYE");
        assert_eq!(FrameId::parse(b"X\0\0\0").unwrap(), "X");

        assert!(FrameId::parse(b"\0\0\0\0").is_none());
        assert!(FrameId::parse(b"tit2").is_none());
        assert!(FrameId::parse(b"TI\0T").is_none());
        assert!(FrameId::parse(b"TIT\xFF").is_none());
        assert!(FrameId::parse(b"").is_none());
    }

    #[test]
    fn parse_v3_frame() {
        let data = b"TIT2\x00\x00\x00\x0D\x00\x00\x00Hello World\0";
        let frames = scan(&header(3, 0), data, &ParseOptions::default()).unwrap();

        assert_eq!(&frames["TIT2"], "Hello World");
        assert_eq!(frames.len(), 1);
    }

    #[test]
    fn parse_v2_frame() {
        let data = b"TP1\x00\x00\x07\x00Artist\
                     CRM\x00\x00\x03abc";
        let frames = scan(&header(2, 0), data, &ParseOptions::default()).unwrap();

        assert_eq!(&frames["TPE1"], "Artist");
        assert_eq!(&frames["CRM"], "abc");
        assert!(!frames.contains("TP1"));
    }

    #[test]
    fn parse_v4_frame() {
        // Synchsafe size of 130 bytes, which would be 258 if read as a plain integer.
        let mut data = b"TALB\x00\x00\x01\x02\x00\x00\x03".to_vec();
        data.extend(vec![b'a'; 129]);

        let frames = scan(&header(4, 0), &data, &ParseOptions::default()).unwrap();

        assert_eq!(frames["TALB"].len(), 129);
    }

    #[test]
    fn skip_padding() {
        let data = b"TIT2\x00\x00\x00\x06\x00\x00\x00Title\
                     \0\0\0\0\0\0\0\
                     TPE1\x00\x00\x00\x07\x00\x00\x00Artist\
                     \0\0\0\0\0\0\0\0\0\0\0\0\0";
        let frames = scan(&header(3, 0), data, &ParseOptions::default()).unwrap();

        assert_eq!(&frames["TIT2"], "Title");
        assert_eq!(&frames["TPE1"], "Artist");
        assert_eq!(frames.len(), 2);
    }

    #[test]
    fn skip_garbage() {
        let data = b"\xFF\xFBgarbage\
                     TIT2\x00\x00\x00\x06\x00\x00\x00Title\
                     TP";
        let frames = scan(&header(3, 0), data, &ParseOptions::default()).unwrap();

        assert_eq!(&frames["TIT2"], "Title");
        assert_eq!(frames.len(), 1);
    }

    #[test]
    fn fail_truncated_frame() {
        let data = b"TIT2\x00\x00\x00\x20\x00\x00\x00Title";

        assert!(matches!(
            scan(&header(3, 0), data, &ParseOptions::default()),
            Err(ParseError::UnexpectedEof)
        ));

        assert!(matches!(
            scan(&header(3, 0), b"TIT2\x00\x00", &ParseOptions::default()),
            Err(ParseError::UnexpectedEof)
        ));
    }

    #[test]
    fn fail_encrypted_frame() {
        let data = b"TIT2\x00\x00\x00\x06\x00\x04\x00Title";

        match scan(&header(4, 0), data, &ParseOptions::default()) {
            Err(ParseError::FrameEncryptionUnsupported(id)) => assert_eq!(id, "TIT2"),
            _ => panic!("encrypted frame was not rejected"),
        }

        let data = b"TIT2\x00\x00\x00\x06\x00\x40\x00Title";

        assert!(matches!(
            scan(&header(3, 0), data, &ParseOptions::default()),
            Err(ParseError::FrameEncryptionUnsupported(_))
        ));
    }

    #[test]
    fn parse_data_length_indicator() {
        let data = b"TIT2\x00\x00\x00\x0A\x00\x01\x00\x00\x00\x06\x00Title";
        let frames = scan(&header(4, 0), data, &ParseOptions::default()).unwrap();

        assert_eq!(&frames["TIT2"], "Title");
    }

    #[test]
    fn parse_grouped_frame() {
        let data = b"TIT2\x00\x00\x00\x07\x00\x40\x01\x00Title\
                     TPE1\x00\x00\x00\x07\x00\x20\x01\x00Title";

        assert_eq!(
            &scan(&header(4, 0), &data[..17], &ParseOptions::default()).unwrap()["TIT2"],
            "Title"
        );

        assert_eq!(
            &scan(&header(3, 0), &data[17..], &ParseOptions::default()).unwrap()["TPE1"],
            "Title"
        );
    }

    #[test]
    fn parse_compressed_frame() {
        // An inflater that ignores its input.
        let options = ParseOptions::new()
            .inflater(|_: &[u8]| Ok::<Vec<u8>, String>(b"\x00Inflated".to_vec()));

        let data = b"TIT2\x00\x00\x00\x07\x00\x80\x00\x00\x00\x09xyz";
        let frames = scan(&header(3, 0), data, &options).unwrap();
        assert_eq!(&frames["TIT2"], "Inflated");

        let data = b"TIT2\x00\x00\x00\x07\x00\x09\x00\x00\x00\x09xyz";
        let frames = scan(&header(4, 0), data, &options).unwrap();
        assert_eq!(&frames["TIT2"], "Inflated");
    }

    #[test]
    fn handle_failed_decompression() {
        let options = ParseOptions::new()
            .inflater(|_: &[u8]| Err::<Vec<u8>, String>("no".to_string()));

        let data = b"TIT2\x00\x00\x00\x07\x00\x80\x00\x00\x00\x09xyz\
                     TPE1\x00\x00\x00\x07\x00\x00\x00Artist";

        assert!(matches!(
            scan(&header(3, 0), data, &options),
            Err(ParseError::Decompress(_))
        ));

        let options = options.frame_errors(FrameErrorPolicy::Skip);
        let frames = scan(&header(3, 0), data, &options).unwrap();

        assert!(!frames.contains("TIT2"));
        assert_eq!(&frames["TPE1"], "Artist");
    }

    #[test]
    fn handle_bad_frames() {
        let data = b"TIT2\x00\x00\x00\x06\x00\x00\x09Title\
                     TPE1\x00\x00\x00\x07\x00\x00\x00Artist";

        assert!(matches!(
            scan(&header(3, 0), data, &ParseOptions::default()),
            Err(ParseError::UnknownEncoding(0x09))
        ));

        let options = ParseOptions::new().frame_errors(FrameErrorPolicy::Skip);
        let frames = scan(&header(3, 0), data, &options).unwrap();

        assert_eq!(frames.len(), 1);
        assert_eq!(&frames["TPE1"], "Artist");
    }

    #[test]
    fn remove_unsync() {
        let data = b"TIT2\x00\x00\x00\x05\x00\x00\x00\xFF\x00\xFE\xFF\x00";
        let frames = scan(&header(3, 0x80), data, &ParseOptions::default()).unwrap();
        assert_eq!(&frames["TIT2"], "\u{FF}\u{FE}\u{FF}");

        let data = b"TIT2\x00\x00\x00\x05\x00\x02\x00\xFF\x00\xFE\xFF\x00";
        let frames = scan(&header(4, 0), data, &ParseOptions::default()).unwrap();
        assert_eq!(&frames["TIT2"], "\u{FF}\u{FE}\u{FF}");

        let frames = scan(&header(3, 0), data, &ParseOptions::default()).unwrap();
        assert_eq!(&frames["TIT2"], "\u{FF}");
    }

    #[test]
    fn apply_user_frames_last() {
        let data = b"TXXX\x00\x00\x00\x0E\x00\x00\x00ARTIST\0Better\
                     TPE1\x00\x00\x00\x07\x00\x00\x00Artist\
                     TXXX\x00\x00\x00\x0E\x00\x00\x00UNKNOWN\0Value";
        let frames = scan(&header(3, 0), data, &ParseOptions::default()).unwrap();

        assert_eq!(&frames["TPE1"], "Better");
        assert!(!frames.contains("TXXX"));
        assert_eq!(frames.len(), 1);
    }

    #[test]
    fn store_other_frames() {
        let data = b"APIC\x00\x00\x00\x04\x00\x00\x89PNG\
                     PRIV\x00\x00\x00\x03\x00\x00abc\
                     COMM\x00\x00\x00\x0B\x00\x00\x00engdesc\0Hi\
                     WOAR\x00\x00\x00\x04\x00\x00\xE9abc";
        let frames = scan(&header(3, 0), data, &ParseOptions::default()).unwrap();

        assert!(!frames.contains("APIC"));
        assert!(!frames.contains("PRIV"));
        assert_eq!(&frames["COMM"], "Hi");
        assert_eq!(&frames["WOAR"], "\u{E9}abc");
        assert_eq!(frames.len(), 2);
    }

    #[test]
    fn skip_binary_frames_undecoded() {
        // Binary frames are dropped before they reach the inflater.
        let options = ParseOptions::new()
            .inflater(|_: &[u8]| Err::<Vec<u8>, String>("no".to_string()));

        let data = b"APIC\x00\x00\x00\x07\x00\x80\x00\x00\x00\x09xyz\
                     TPE1\x00\x00\x00\x07\x00\x00\x00Artist";
        let frames = scan(&header(3, 0), data, &options).unwrap();

        assert!(!frames.contains("APIC"));
        assert_eq!(&frames["TPE1"], "Artist");
    }

    #[test]
    fn remove_unsync_before_inflating() {
        // Only the resynchronised bytes are accepted.
        let options = ParseOptions::new().inflater(|data: &[u8]| {
            if data == b"\xFF\xE0\x12" {
                Ok(b"\x03Title".to_vec())
            } else {
                Err(format!("unexpected input {:02X?}", data))
            }
        });

        // Compressed, unsynchronised, with a data length indicator.
        let data = b"TIT2\x00\x00\x00\x08\x00\x0B\x00\x00\x00\x06\xFF\x00\xE0\x12";
        let frames = scan(&header(4, 0), data, &options).unwrap();
        assert_eq!(&frames["TIT2"], "Title");

        // The same goes for tag-wide unsynchronisation.
        let data = b"TIT2\x00\x00\x00\x08\x00\x09\x00\x00\x00\x06\xFF\x00\xE0\x12";
        let frames = scan(&header(4, 0x80), data, &options).unwrap();
        assert_eq!(&frames["TIT2"], "Title");
    }

    #[test]
    fn drop_empty_frames() {
        let data = b"TIT2\x00\x00\x00\x00\x00\x00\
                     TPE1\x00\x00\x00\x07\x00\x00\x00Artist";
        let frames = scan(&header(3, 0), data, &ParseOptions::default()).unwrap();

        assert!(!frames.contains("TIT2"));
        assert_eq!(&frames["TPE1"], "Artist");
    }
}
