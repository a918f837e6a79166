use crate::core::BufStream;
use crate::id3v2::{syncdata, ParseError, ParseResult};
use log::info;
use std::ops::Range;

pub(crate) const ID_HEADER: &[u8] = b"ID3";
pub(crate) const FOOTER_SIZE: u32 = 10;

/// The fixed 10-byte header at the start of every ID3v2 tag.
#[derive(Clone, Debug)]
pub struct TagHeader {
    major: u8,
    minor: u8,
    flags: TagFlags,
    size: u32,
}

impl TagHeader {
    pub(crate) fn parse(raw: [u8; 10]) -> ParseResult<Self> {
        // Anything else is not an ID3v2 tag at all.
        if &raw[0..3] != ID_HEADER {
            return Err(ParseError::BadHeader);
        }

        let major = raw[3];
        let minor = raw[4];

        if !(2..=4).contains(&major) {
            return Err(ParseError::UnsupportedVersion(major));
        }

        let flags = TagFlags::from_raw(raw[5]);

        let size = syncdata::to_u28([raw[6], raw[7], raw[8], raw[9]]);

        Ok(TagHeader {
            major,
            minor,
            flags,
            size,
        })
    }

    pub fn major(&self) -> u8 {
        self.major
    }

    pub fn minor(&self) -> u8 {
        self.minor
    }

    /// The size declared by the header. This excludes the header itself and is never
    /// adjusted after decoding.
    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn flags(&self) -> &TagFlags {
        &self.flags
    }

    /// Computes the range of the body that holds frames, given the extended header that was
    /// read from the start of the body. Anything past the end of the range is padding.
    pub(crate) fn frame_region(&self, ext: &ExtendedHeader) -> ParseResult<Range<usize>> {
        let mut trailing = ext.padding;

        if self.flags.footer {
            trailing = trailing
                .checked_add(FOOTER_SIZE)
                .ok_or(ParseError::UnexpectedEof)?;
        }

        let len = self
            .size
            .checked_sub(ext.consumed)
            .and_then(|size| size.checked_sub(trailing))
            .ok_or(ParseError::UnexpectedEof)?;

        let start = ext.consumed as usize;

        Ok(start..start + len as usize)
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct TagFlags {
    pub unsync: bool,
    pub extended: bool,
    pub experimental: bool,
    pub footer: bool,
}

impl TagFlags {
    fn from_raw(flags: u8) -> Self {
        TagFlags {
            unsync: flags & 0x80 != 0,
            extended: flags & 0x40 != 0,
            experimental: flags & 0x20 != 0,
            footer: flags & 0x10 != 0,
        }
    }
}

/// The parts of an extended header that affect how the rest of the tag is read. Its
/// structured contents (CRC, restrictions, update flag) are skipped.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ExtendedHeader {
    /// How many bytes the extended header occupied at the start of the body.
    pub consumed: u32,
    /// How many bytes of padding follow the frames.
    pub padding: u32,
}

impl ExtendedHeader {
    pub(crate) fn parse(stream: &mut BufStream, major: u8) -> ParseResult<Self> {
        let start = stream.pos();

        let padding = match major {
            3 => parse_ext_v3(stream)?,
            4 => parse_ext_v4(stream)?,
            _ => return Err(ParseError::UnsupportedHeaderFlag),
        };

        Ok(ExtendedHeader {
            consumed: (stream.pos() - start) as u32,
            padding,
        })
    }
}

fn parse_ext_v3(stream: &mut BufStream) -> ParseResult<u32> {
    // The size excludes itself, so a bare header is 6 bytes and one with a CRC is 10.
    let size = stream.read_u32()?;
    let _flags = stream.read_u16()?;
    let padding = stream.read_u32()?;

    if size > 6 {
        info!(target: "id3v2", "discarding {} bytes of extended header data", size - 6);
        stream.skip((size - 6) as usize)?;
    }

    Ok(padding)
}

fn parse_ext_v4(stream: &mut BufStream) -> ParseResult<u32> {
    // Unlike v3, the size here includes itself.
    let size = syncdata::read_u28(stream)?;
    let _flag_bytes = stream.read_u8()?;
    let _flags = stream.read_u8()?;

    stream.skip(size.saturating_sub(6) as usize)?;

    Ok(0)
}
