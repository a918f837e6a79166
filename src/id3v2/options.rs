use std::fmt::{self, Debug, Formatter};

/// What to do when a single frame cannot be decoded.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FrameErrorPolicy {
    /// Abort the whole tag. This is the default.
    Abort,
    /// Log the failure and drop the frame. Truncated frame headers and encrypted frames
    /// still abort the tag, as there is no way to continue past them.
    Skip,
}

impl Default for FrameErrorPolicy {
    fn default() -> Self {
        Self::Abort
    }
}

/// A decompression capability for frames that are flagged as compressed.
///
/// Any `Fn(&[u8]) -> Result<Vec<u8>, String>` closure implements this trait, which is
/// useful for substituting a stub.
pub trait Inflate {
    fn inflate(&self, data: &[u8]) -> Result<Vec<u8>, String>;
}

impl<F> Inflate for F
where
    F: Fn(&[u8]) -> Result<Vec<u8>, String>,
{
    fn inflate(&self, data: &[u8]) -> Result<Vec<u8>, String> {
        self(data)
    }
}

/// Inflates zlib streams with `miniz_oxide`.
#[cfg(feature = "id3v2_zlib")]
#[derive(Clone, Copy, Debug, Default)]
pub struct ZlibInflater;

#[cfg(feature = "id3v2_zlib")]
impl Inflate for ZlibInflater {
    fn inflate(&self, data: &[u8]) -> Result<Vec<u8>, String> {
        miniz_oxide::inflate::decompress_to_vec_zlib(data)
            .map_err(|status| format!("zlib inflate failed: {:?}", status))
    }
}

/// Fails every compressed frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoInflater;

impl Inflate for NoInflater {
    fn inflate(&self, _: &[u8]) -> Result<Vec<u8>, String> {
        Err("decompression is not available".to_string())
    }
}

pub struct ParseOptions {
    pub frame_errors: FrameErrorPolicy,
    pub inflater: Box<dyn Inflate>,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame_errors(mut self, policy: FrameErrorPolicy) -> Self {
        self.frame_errors = policy;
        self
    }

    pub fn inflater(mut self, inflater: impl Inflate + 'static) -> Self {
        self.inflater = Box::new(inflater);
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        #[cfg(feature = "id3v2_zlib")]
        let inflater: Box<dyn Inflate> = Box::new(ZlibInflater);

        #[cfg(not(feature = "id3v2_zlib"))]
        let inflater: Box<dyn Inflate> = Box::new(NoInflater);

        ParseOptions {
            frame_errors: FrameErrorPolicy::default(),
            inflater,
        }
    }
}

impl Debug for ParseOptions {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("ParseOptions")
            .field("frame_errors", &self.frame_errors)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_inflate() {
        let opts = ParseOptions::new()
            .frame_errors(FrameErrorPolicy::Skip)
            .inflater(|data: &[u8]| Ok::<Vec<u8>, String>(data.iter().rev().copied().collect()));

        assert_eq!(opts.frame_errors, FrameErrorPolicy::Skip);
        assert_eq!(opts.inflater.inflate(b"\x01\x02\x03").unwrap(), b"\x03\x02\x01");
    }

    #[test]
    fn no_inflater_fails() {
        assert!(NoInflater.inflate(b"\x78\x9C").is_err());
    }

    #[test]
    #[cfg(feature = "id3v2_zlib")]
    fn zlib_inflates() {
        // zlib stream of "Hello"
        let data = b"\x78\x9C\xF3\x48\xCD\xC9\xC9\x07\x00\x05\x8C\x01\xF5";

        assert_eq!(ZlibInflater.inflate(data).unwrap(), b"Hello");
        assert!(ZlibInflater.inflate(b"\x00\x01\x02").is_err());
    }
}
