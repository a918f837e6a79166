//! ID3v2 tag reading.
//!
//! ID3v2 is the tag format found at the start of most MP3 files, and occasionally in other
//! containers. Three versions are in use: ID3v2.2, ID3v2.3 and ID3v2.4. They share a header
//! layout but differ in the shape of their frames, all of which is handled here.
//!
//! Only textual metadata is decoded. Every frame is exposed as a string keyed by its
//! ID3v2.3/ID3v2.4 frame ID, with a few fields (disc, track, release date) parsed into
//! a more useful form.

mod compat;
mod fields;
pub mod frame_map;
pub mod frames;
pub mod header;
pub mod options;
pub mod syncdata;

pub use frame_map::FrameMap;
pub use frames::FrameId;
pub use header::{ExtendedHeader, TagFlags, TagHeader};
pub use options::{FrameErrorPolicy, Inflate, NoInflater, ParseOptions};

#[cfg(feature = "id3v2_zlib")]
pub use options::ZlibInflater;

use crate::core::BufStream;
use crate::string::DecodeError;
use chrono::{DateTime, FixedOffset};
use log::info;
use std::error;
use std::fmt::{self, Display, Formatter};
use std::io::{self, ErrorKind, Read};

/// A decoded ID3v2 tag.
#[derive(Clone, Debug)]
pub struct Tag {
    header: TagHeader,
    extended_header: Option<ExtendedHeader>,
    frames: FrameMap,
    disc: i32,
    total_discs: i32,
    track: i32,
    total_tracks: i32,
    date: Option<DateTime<FixedOffset>>,
}

impl Tag {
    /// Reads a tag from the start of `reader`. The whole tag is consumed, including any padding,
    /// so that the reader is left positioned at whatever follows the tag.
    ///
    /// If the data ends before the declared size, every frame that is complete is still read.
    /// Running out of data in the middle of a frame fails with [`ParseError::UnexpectedEof`].
    pub fn read_from<R: Read>(reader: &mut R, options: &ParseOptions) -> ParseResult<Self> {
        let mut raw = [0; 10];
        reader.read_exact(&mut raw)?;

        let header = TagHeader::parse(raw)?;

        // The declared size is not trusted until the data actually exists. A tag that is
        // cut short is scanned as far as it goes, so only a partial frame is an error.
        let size = u64::from(header.size());
        let mut body = Vec::new();
        reader.by_ref().take(size).read_to_end(&mut body)?;

        if (body.len() as u64) < size {
            info!(
                target: "id3v2",
                "tag ends {} bytes short of its declared size",
                size - body.len() as u64
            );
        }

        Self::parse_body(header, &body, options)
    }

    /// Decodes a tag from the start of `data` with the default [`ParseOptions`].
    pub fn parse(mut data: &[u8]) -> ParseResult<Self> {
        Self::read_from(&mut data, &ParseOptions::default())
    }

    fn parse_body(header: TagHeader, body: &[u8], options: &ParseOptions) -> ParseResult<Self> {
        let extended_header = if header.flags().extended {
            Some(ExtendedHeader::parse(
                &mut BufStream::new(body),
                header.major(),
            )?)
        } else {
            None
        };

        let region = header.frame_region(&extended_header.unwrap_or_default())?;
        let end = region.end.min(body.len());
        let region = body.get(region.start..end).ok_or(ParseError::UnexpectedEof)?;

        let frames = frames::scan(&header, region, options)?;

        let (disc, total_discs) = number_pair(&frames, "TPOS")?;
        let (track, total_tracks) = number_pair(&frames, "TRCK")?;
        let date = fields::parse_date(&frames);

        if date.is_none() && !frames.is_empty() {
            info!(target: "id3v2", "no release date could be found");
        }

        Ok(Tag {
            header,
            extended_header,
            frames,
            disc,
            total_discs,
            track,
            total_tracks,
            date,
        })
    }

    pub fn header(&self) -> &TagHeader {
        &self.header
    }

    pub fn extended_header(&self) -> Option<&ExtendedHeader> {
        self.extended_header.as_ref()
    }

    /// Returns the major and minor version of this tag.
    pub fn version(&self) -> (u8, u8) {
        (self.header.major(), self.header.minor())
    }

    pub fn frames(&self) -> &FrameMap {
        &self.frames
    }

    pub fn title(&self) -> Option<&str> {
        self.frames.get("TIT2")
    }

    pub fn artist(&self) -> Option<&str> {
        self.frames.get("TPE1")
    }

    pub fn album_artist(&self) -> Option<&str> {
        self.frames.get("TPE2")
    }

    pub fn album(&self) -> Option<&str> {
        self.frames.get("TALB")
    }

    pub fn genre(&self) -> Option<&str> {
        self.frames.get("TCON")
    }

    pub fn composer(&self) -> Option<&str> {
        self.frames.get("TCOM")
    }

    /// The text of the last comment frame in the tag.
    pub fn notes(&self) -> Option<&str> {
        self.frames.get("COMM")
    }

    pub fn disc(&self) -> i32 {
        self.disc
    }

    pub fn total_discs(&self) -> i32 {
        self.total_discs
    }

    pub fn track(&self) -> i32 {
        self.track
    }

    pub fn total_tracks(&self) -> i32 {
        self.total_tracks
    }

    /// The release date, if any date frame could be understood.
    pub fn date(&self) -> Option<DateTime<FixedOffset>> {
        self.date
    }
}

fn number_pair(frames: &FrameMap, id: &str) -> ParseResult<(i32, i32)> {
    match frames.get(id) {
        Some(field) => fields::parse_number_pair(field),
        None => Ok((0, 0)),
    }
}

#[derive(Debug)]
pub enum ParseError {
    /// The data does not start with an ID3v2 tag.
    BadHeader,
    UnsupportedVersion(u8),
    /// An ID3v2.2 tag declared an extended header, which does not exist in that version.
    UnsupportedHeaderFlag,
    FrameEncryptionUnsupported(FrameId),
    UnknownEncoding(u8),
    MalformedBom,
    /// The tag ended in the middle of a structure.
    UnexpectedEof,
    BadNumberField(String),
    /// A compressed frame could not be inflated.
    Decompress(String),
    IoError(io::Error),
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::BadHeader => write![f, "no ID3v2 header found"],
            Self::UnsupportedVersion(major) => write![f, "unsupported version ID3v2.{}", major],
            Self::UnsupportedHeaderFlag => write![f, "unsupported header flag"],
            Self::FrameEncryptionUnsupported(id) => {
                write![f, "frame {} is encrypted, which is not supported", id]
            }
            Self::UnknownEncoding(enc) => write![f, "unknown text encoding {:#04x}", enc],
            Self::MalformedBom => write![f, "malformed UTF-16 byte order mark"],
            Self::UnexpectedEof => write![f, "unexpected end of tag data"],
            Self::BadNumberField(field) => write![f, "bad number field {:?}", field],
            Self::Decompress(err) => write![f, "decompression failed: {}", err],
            Self::IoError(err) => write![f, "{}", err],
        }
    }
}

impl error::Error for ParseError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for ParseError {
    fn from(other: io::Error) -> Self {
        match other.kind() {
            ErrorKind::UnexpectedEof => Self::UnexpectedEof,
            _ => Self::IoError(other),
        }
    }
}

impl From<DecodeError> for ParseError {
    fn from(other: DecodeError) -> Self {
        match other {
            DecodeError::MalformedBom => Self::MalformedBom,
            DecodeError::UnexpectedEof => Self::UnexpectedEof,
        }
    }
}

pub type ParseResult<T> = Result<T, ParseError>;
