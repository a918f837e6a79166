//! Synchsafe integers and unsynchronisation.

use crate::core::BufStream;
use std::io;

/// Decodes a 4-byte synchsafe integer. Only the low 7 bits of each byte contribute, the
/// high bit is ignored rather than validated.
pub fn to_u28(raw: [u8; 4]) -> u32 {
    raw.iter()
        .fold(0, |sum, &byte| (sum << 7) | u32::from(byte & 0x7F))
}

/// Encodes the low 28 bits of `num` as a synchsafe integer.
pub fn from_u28(num: u32) -> [u8; 4] {
    [
        ((num >> 21) & 0x7F) as u8,
        ((num >> 14) & 0x7F) as u8,
        ((num >> 7) & 0x7F) as u8,
        (num & 0x7F) as u8,
    ]
}

pub(crate) fn read_u28(stream: &mut BufStream) -> io::Result<u32> {
    Ok(to_u28(stream.read_array()?))
}

/// Removes the unsynchronisation scheme from `src`, turning every `FF 00` pair into `FF`.
pub fn decode(src: &[u8]) -> Vec<u8> {
    // This is an implementation of Taglib's fast syncdata decoding algorithm.
    // https://github.com/taglib/taglib/blob/master/taglib/mpeg/id3v2/id3v2synchdata.cpp#L75
    let mut dest = Vec::with_capacity(src.len());

    if src.is_empty() {
        return dest;
    }

    let mut pos = 0;

    while pos < src.len() - 1 {
        dest.push(src[pos]);
        pos += 1;

        // Both sync guards (FF XX -> FF 00 XX and FF 00 -> FF 00 00) share the
        // initial FF 00 bytes, so dropping the zero after any FF undoes either one.
        if src[pos - 1] == 0xFF && src[pos] == 0x00 {
            pos += 1;
        }
    }

    if pos < src.len() {
        dest.push(src[pos]);
    }

    dest
}
