//! Text information frames.

use crate::core::BufStream;
use crate::id3v2::frames::encoding;
use crate::id3v2::ParseResult;
use crate::string;
use log::info;

/// Free-text TXXX descriptions that stand in for a dedicated frame, as written by
/// taggers that prefer Vorbis-style field names.
const USER_FRAME_NAMES: &[(&str, &str)] = &[
    ("ALBUM", "TALB"),
    ("BPM", "TBPM"),
    ("COMPOSER", "TCOM"),
    ("GENRE", "TCON"),
    ("COPYRIGHT", "TCOP"),
    ("ENCODINGTIME", "TDEN"),
    ("PLAYLISTDELAY", "TDLY"),
    ("ORIGINALDATE", "TDOR"),
    ("DATE", "TDRC"),
    ("RELEASEDATE", "TDRL"),
    ("TAGGINGDATE", "TDTG"),
    ("ENCODEDBY", "TENC"),
    ("LYRICIST", "TEXT"),
    ("FILETYPE", "TFLT"),
    ("CONTENTGROUP", "TIT1"),
    ("TITLE", "TIT2"),
    ("SUBTITLE", "TIT3"),
    ("INITIALKEY", "TKEY"),
    ("LANGUAGE", "TLAN"),
    ("LENGTH", "TLEN"),
    ("MEDIA", "TMED"),
    ("MOOD", "TMOO"),
    ("ORIGINALALBUM", "TOAL"),
    ("ORIGINALFILENAME", "TOFN"),
    ("ORIGINALLYRICIST", "TOLY"),
    ("ORIGINALARTIST", "TOPE"),
    ("OWNER", "TOWN"),
    ("ARTIST", "TPE1"),
    ("ALBUMARTIST", "TPE2"),
    ("CONDUCTOR", "TPE3"),
    ("REMIXER", "TPE4"),
    ("DISCNUMBER", "TPOS"),
    ("PRODUCEDNOTICE", "TPRO"),
    ("LABEL", "TPUB"),
    ("TRACKNUMBER", "TRCK"),
    ("RADIOSTATION", "TRSN"),
    ("RADIOSTATIONOWNER", "TRSO"),
    ("ALBUMSORT", "TSOA"),
    ("ARTISTSORT", "TSOP"),
    ("TITLESORT", "TSOT"),
    ("ALBUMARTISTSORT", "TSO2"),
    ("ISRC", "TSRC"),
    ("ENCODING", "TSSE"),
];

/// A TXXX frame whose description maps onto a canonical frame.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct UserText {
    pub id: &'static str,
    pub value: String,
}

pub(crate) fn parse_text(stream: &mut BufStream) -> ParseResult<String> {
    let encoding = encoding::parse(stream)?;
    let mut text = string::read(encoding, stream)?;

    // Multiple values are separated by NULs, only the first is kept.
    if let Some(idx) = text.find('\0') {
        text.truncate(idx);
    }

    Ok(text)
}

pub(crate) fn parse_user_text(stream: &mut BufStream) -> ParseResult<Option<UserText>> {
    let encoding = encoding::parse(stream)?;
    let desc = string::read_terminated(encoding, stream)?;
    let value = string::read(encoding, stream)?;

    match user_frame_id(&desc) {
        Some(id) => Ok(Some(UserText { id, value })),
        None => {
            info!(target: "id3v2", "discarding TXXX frame with unmapped description {:?}", desc);
            Ok(None)
        }
    }
}

fn user_frame_id(desc: &str) -> Option<&'static str> {
    let desc = desc.to_ascii_uppercase();

    USER_FRAME_NAMES
        .iter()
        .find(|(name, _)| *name == desc)
        .map(|(_, id)| *id)
}
