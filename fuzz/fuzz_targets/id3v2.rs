#![no_main]

use libfuzzer_sys::fuzz_target;
use tagsift::id3v2::{FrameErrorPolicy, ParseOptions, Tag};

fuzz_target!(|data: &[u8]| {
    // Any input is allowed to fail, but never to panic.
    let _ = Tag::parse(data);

    let options = ParseOptions::new().frame_errors(FrameErrorPolicy::Skip);
    let _ = Tag::read_from(&mut &data[..], &options);
});
