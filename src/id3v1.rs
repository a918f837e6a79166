//! ID3v1 tag reading.
//!
//! ID3v1 is a fixed 128-byte block at the very end of a file. It predates ID3v2 and can
//! only hold a handful of short Latin-1 fields, but many files still carry one alongside
//! (or instead of) an ID3v2 tag.

use crate::string;
use log::info;
use std::error;
use std::fmt::{self, Display, Formatter};
use std::io::{self, Read, Seek, SeekFrom};
use std::str;

pub const TAG_SIZE: usize = 128;

const ID_HEADER: &[u8] = b"TAG";

/// The Winamp genre list, indexed by the genre byte.
pub const GENRES: &[&str] = &[
    "Blues", "Classic Rock", "Country", "Dance", "Disco", "Funk", "Grunge", "Hip-Hop", "Jazz",
    "Metal", "New Age", "Oldies", "Other", "Pop", "R&B", "Rap", "Reggae", "Rock", "Techno",
    "Industrial", "Alternative", "Ska", "Death Metal", "Pranks", "Soundtrack", "Euro-Techno",
    "Ambient", "Trip-Hop", "Vocal", "Jazz+Funk", "Fusion", "Trance", "Classical",
    "Instrumental", "Acid", "House", "Game", "Sound Clip", "Gospel", "Noise",
    "Alternative Rock", "Bass", "Soul", "Punk", "Space", "Meditative", "Instrumental Pop",
    "Instrumental Rock", "Ethnic", "Gothic", "Darkwave", "Techno-Industrial", "Electronic",
    "Pop-Folk", "Eurodance", "Dream", "Southern Rock", "Comedy", "Cult", "Gangsta", "Top 40",
    "Christian Rap", "Pop/Funk", "Jungle", "Native US", "Cabaret", "New Wave", "Psychadelic",
    "Rave", "Showtunes", "Trailer", "Lo-Fi", "Tribal", "Acid Punk", "Acid Jazz", "Polka",
    "Retro", "Musical", "Rock & Roll", "Hard Rock", "Folk", "Folk-Rock", "National Folk",
    "Swing", "Fast Fusion", "Bebop", "Latin", "Revival", "Celtic", "Bluegrass", "Avantgarde",
    "Gothic Rock", "Progressive Rock", "Psychedelic Rock", "Symphonic Rock", "Slow Rock",
    "Big Band", "Chorus", "Easy Listening", "Acoustic", "Humour", "Speech", "Chanson", "Opera",
    "Chamber Music", "Sonata", "Symphony", "Booty Bass", "Primus", "Porn Groove", "Satire",
    "Slow Jam", "Club", "Tango", "Samba", "Folklore", "Ballad", "Power Ballad", "Rhytmic Soul",
    "Freestyle", "Duet", "Punk Rock", "Drum Solo", "Acapella", "Euro-House", "Dance Hall",
    "Goa", "Drum & Bass", "Club-House", "Hardcore", "Terror", "Indie", "BritPop", "Afro-Punk",
    "Polsk Punk", "Beat", "Christian Gangsta Rap", "Heavy Metal", "Black Metal", "Crossover",
    "Contemporary Christian", "Christian Rock", "Merengue", "Salsa", "Thrash Metal", "Anime",
    "JPop", "Synthpop",
];

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Tag {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub year: Option<u16>,
    pub comment: String,
    pub track: Option<u8>,
    pub genre: Option<&'static str>,
}

impl Tag {
    /// Reads the tag at the end of `reader`. The reader is left at the end of the stream.
    pub fn read_from<R: Read + Seek>(reader: &mut R) -> ReadResult<Self> {
        let len = reader.seek(SeekFrom::End(0))?;

        if len < TAG_SIZE as u64 {
            return Err(ReadError::NotFound);
        }

        reader.seek(SeekFrom::End(-(TAG_SIZE as i64)))?;

        let mut raw = [0; TAG_SIZE];
        reader.read_exact(&mut raw)?;

        Self::parse(&raw)
    }

    pub fn parse(raw: &[u8; TAG_SIZE]) -> ReadResult<Self> {
        if &raw[0..3] != ID_HEADER {
            return Err(ReadError::NotFound);
        }

        let year = str::from_utf8(&raw[93..97])
            .ok()
            .and_then(|year| year.parse().ok());

        if year.is_none() {
            info!(target: "id3v1", "ignoring malformed year {:?}", &raw[93..97]);
        }

        let genre = GENRES.get(raw[127] as usize).copied();

        if genre.is_none() {
            info!(target: "id3v1", "no genre for index {}", raw[127]);
        }

        Ok(Tag {
            title: parse_field(&raw[3..33]),
            artist: parse_field(&raw[33..63]),
            album: parse_field(&raw[63..93]),
            year,
            comment: parse_field(&raw[97..126]),
            track: Some(raw[126]).filter(|&track| track != 0),
            genre,
        })
    }
}

/// Decodes a fixed-width field, which ends at the first NUL and may be padded with spaces.
fn parse_field(data: &[u8]) -> String {
    let end = data.iter().position(|&ch| ch == 0).unwrap_or(data.len());
    string::decode_latin1(&data[..end]).trim_end().to_string()
}

#[derive(Debug)]
pub enum ReadError {
    /// There is no ID3v1 tag at the end of the data.
    NotFound,
    IoError(io::Error),
}

impl Display for ReadError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::NotFound => write![f, "no ID3v1 tag found"],
            Self::IoError(err) => write![f, "{}", err],
        }
    }
}

impl error::Error for ReadError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::IoError(err) => Some(err),
            Self::NotFound => None,
        }
    }
}

impl From<io::Error> for ReadError {
    fn from(other: io::Error) -> Self {
        Self::IoError(other)
    }
}

pub type ReadResult<T> = Result<T, ReadError>;
