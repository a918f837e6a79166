use crate::{errorln, print_entry, print_header};

use clap::Values;
use std::cmp::Ordering;
use std::error;
use std::fmt::{self, Display, Formatter};
use std::fs::File;
use std::io::{self, BufReader, ErrorKind};
use std::path::Path;
use tagsift::id3v2::{FrameErrorPolicy, ParseError, ParseOptions};
use tagsift::{id3v1, id3v2};

const ID3V2_HEADER_SIZE: u64 = 10;

/// Frames that have a readable name, shown first and in this order.
static FIELD_NAMES: &[(&str, &str)] = &[
    ("TIT2", "title"),
    ("TPE1", "artist"),
    ("TPE2", "album artist"),
    ("TALB", "album"),
    ("TCON", "genre"),
    ("TCOM", "composer"),
    ("COMM", "comment"),
];

#[derive(Debug, Eq, PartialEq)]
pub struct DisplayTag {
    pub name: DisplayName,
    pub value: String,
}

impl DisplayTag {
    fn new(name: DisplayName, value: impl Into<String>) -> Self {
        DisplayTag {
            name,
            value: value.into(),
        }
    }

    pub fn print(&self, indents: usize) {
        print_entry!("{}{}:", format!["{:>i$}", "", i = indents], self.name);

        let split: Vec<&str> = self
            .value
            .split('\n')
            .filter(|string| !string.is_empty())
            .collect();

        if split.len() <= 1 {
            println!(" {}", split.first().unwrap_or(&""));
        } else {
            let indent = format!["{:>i$}", "", i = indents + 2];

            println!();
            for line in split {
                println!("{}{}", indent, line);
            }
        }
    }
}

impl Ord for DisplayTag {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

impl PartialOrd for DisplayTag {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Readable names sort by their position in the field table, raw frame IDs come after
/// them in alphabetical order.
#[derive(Debug, Eq, PartialEq)]
pub enum DisplayName {
    Name(usize, &'static str),
    Frame(String),
}

impl DisplayName {
    fn matches(&self, filter: &[&str]) -> bool {
        match self {
            Self::Name(_, name) => filter.contains(name),
            Self::Frame(id) => filter
                .iter()
                .any(|tag| tag.strip_prefix('^') == Some(id.as_str())),
        }
    }
}

impl Ord for DisplayName {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Name(my_pos, _), Self::Name(other_pos, _)) => my_pos.cmp(other_pos),
            (Self::Frame(my_id), Self::Frame(other_id)) => my_id.cmp(other_id),
            (Self::Name(..), Self::Frame(_)) => Ordering::Less,
            (Self::Frame(_), Self::Name(..)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for DisplayName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for DisplayName {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Name(_, name) => write![f, "{}", name],
            Self::Frame(id) => write![f, "{}", id],
        }
    }
}

/// How the files passed to [`show`] should be read and displayed.
pub struct ShowOptions<'a> {
    /// Show every frame in the tag, not just the ones with a readable name.
    pub all: bool,
    pub skip_bad_frames: bool,
    /// Names like `title`, or raw frame IDs like `^TPE1`, to restrict the output to.
    pub filter: Vec<&'a str>,
}

#[derive(Debug)]
pub enum ShowError {
    IoError(io::Error),
    Id3v2(ParseError),
    NoMetadata,
}

impl Display for ShowError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::IoError(err) => write![f, "{}", err],
            Self::Id3v2(err) => write![f, "malformed ID3v2 tag: {}", err],
            Self::NoMetadata => write![f, "no metadata found"],
        }
    }
}

impl error::Error for ShowError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::IoError(err) => Some(err),
            Self::Id3v2(err) => Some(err),
            Self::NoMetadata => None,
        }
    }
}

impl From<io::Error> for ShowError {
    fn from(other: io::Error) -> Self {
        Self::IoError(other)
    }
}

pub type ShowResult<T> = Result<T, ShowError>;

/// Shows the metadata of every path. Returns false if any file could not be shown.
pub fn show(paths: Values, opts: &ShowOptions) -> bool {
    let mut ok = true;

    for path in paths {
        // It's okay if a file fails to parse here, just log the problem and move on.
        if let Err(err) = show_file(path, opts) {
            errorln!("{}: {}", path, err);
            ok = false;
        }
    }

    ok
}

fn show_file(path: &str, opts: &ShowOptions) -> ShowResult<()> {
    let path = new_path_safe(path)?;
    let file = File::open(path)?;
    let len = file.metadata()?.len();
    let mut file = BufReader::new(file);

    let policy = if opts.skip_bad_frames {
        FrameErrorPolicy::Skip
    } else {
        FrameErrorPolicy::Abort
    };

    let options = ParseOptions::new().frame_errors(policy);

    let (format, mut tags) = match id3v2::Tag::read_from(&mut file, &options) {
        Ok(tag) => {
            let (major, minor) = tag.version();
            (format!["ID3v2.{}.{}", major, minor], id3v2_tags(&tag, opts.all))
        }

        // Files without an ID3v2 tag may still have an ID3v1 tag at their end.
        Err(err) if lacks_id3v2(&err, len) => {
            match id3v1::Tag::read_from(&mut file) {
                Ok(tag) => ("ID3v1".to_string(), id3v1_tags(&tag)),
                Err(id3v1::ReadError::NotFound) => return Err(ShowError::NoMetadata),
                Err(id3v1::ReadError::IoError(err)) => return Err(ShowError::IoError(err)),
            }
        }

        Err(ParseError::IoError(err)) => return Err(ShowError::IoError(err)),
        Err(err) => return Err(ShowError::Id3v2(err)),
    };

    if !opts.filter.is_empty() {
        tags.retain(|tag| tag.name.matches(&opts.filter));
    }

    tags.sort();

    print_header!(path, format);

    for tag in tags {
        tag.print(2)
    }

    Ok(())
}

/// Whether a failed ID3v2 read means that there is no ID3v2 tag at all, rather than a
/// broken one.
fn lacks_id3v2(err: &ParseError, len: u64) -> bool {
    match err {
        ParseError::BadHeader => true,
        ParseError::UnexpectedEof => len < ID3V2_HEADER_SIZE,
        _ => false,
    }
}

fn new_path_safe(string: &str) -> io::Result<&Path> {
    let path = Path::new(string);

    path.metadata()?;

    if path.is_dir() {
        return Err(io::Error::new(ErrorKind::Other, "Is a directory"));
    }

    Ok(path)
}

fn field_name(id: &str) -> Option<DisplayName> {
    FIELD_NAMES
        .iter()
        .position(|(field_id, _)| *field_id == id)
        .map(|pos| DisplayName::Name(pos, FIELD_NAMES[pos].1))
}

fn id3v2_tags(tag: &id3v2::Tag, all: bool) -> Vec<DisplayTag> {
    let mut tags = Vec::new();
    let extra = FIELD_NAMES.len();

    for (id, value) in tag.frames() {
        match field_name(id) {
            Some(name) => tags.push(DisplayTag::new(name, value)),
            None if all => tags.push(DisplayTag::new(DisplayName::Frame(id.clone()), value)),
            None => {}
        }
    }

    if tag.track() != 0 {
        tags.push(DisplayTag::new(
            DisplayName::Name(extra, "track"),
            number_pair(tag.track(), tag.total_tracks()),
        ));
    }

    if tag.disc() != 0 {
        tags.push(DisplayTag::new(
            DisplayName::Name(extra + 1, "disc"),
            number_pair(tag.disc(), tag.total_discs()),
        ));
    }

    if let Some(date) = tag.date() {
        tags.push(DisplayTag::new(
            DisplayName::Name(extra + 2, "date"),
            date.to_rfc3339(),
        ));
    }

    tags
}

fn id3v1_tags(tag: &id3v1::Tag) -> Vec<DisplayTag> {
    let mut tags = Vec::new();

    let mut push = |pos: usize, name: &'static str, value: String| {
        if !value.is_empty() {
            tags.push(DisplayTag::new(DisplayName::Name(pos, name), value))
        }
    };

    push(0, "title", tag.title.clone());
    push(1, "artist", tag.artist.clone());
    push(3, "album", tag.album.clone());
    push(4, "genre", tag.genre.unwrap_or_default().to_string());
    push(6, "comment", tag.comment.clone());
    push(7, "track", tag.track.map(|track| track.to_string()).unwrap_or_default());
    push(9, "date", tag.year.map(|year| year.to_string()).unwrap_or_default());

    tags
}

fn number_pair(value: i32, total: i32) -> String {
    if total != 0 {
        format!["{}/{}", value, total]
    } else {
        value.to_string()
    }
}
