//! ID3v2.2 compatibility.

const V2_V3_CONV: &[(&str, &str)] = &[
    ("BUF", "RBUF"), // Recommended buffer size
    ("CNT", "PCNT"), // Play counter
    ("COM", "COMM"), // Comment
    ("CRA", "AENC"), // Audio Encryption
    // CRM has no analogue
    ("ETC", "ETCO"), // Event timing codes
    ("EQU", "EQUA"), // Equalisation
    ("GEO", "GEOB"), // General object
    ("IPL", "IPLS"), // Involved people list
    ("LNK", "LINK"), // Linked frame
    ("MCI", "MCDI"), // Music CD identifier
    ("MLL", "MLLT"), // MPEG lookup table
    ("PIC", "APIC"), // Attached picture, the body layout differs but is never read
    ("POP", "POPM"), // Popularimeter
    ("REV", "RVRB"), // Reverb
    ("RVA", "RVAD"), // Relative volume adjustment
    ("SLT", "SYLT"), // Synced lyrics/text
    ("STC", "SYTC"), // Synced tempo codes
    ("TAL", "TALB"), // Album/Movie/Show title
    ("TBP", "TBPM"), // BPM
    ("TCM", "TCOM"), // Composer
    ("TCO", "TCON"), // Content type
    ("TCR", "TCOP"), // Copyright message
    ("TDA", "TDAT"), // Date
    ("TDY", "TDLY"), // Playlist delay
    ("TFT", "TFLT"), // File type
    ("TEN", "TENC"), // Encoded by
    ("TIM", "TIME"), // Recording time
    ("TKE", "TKEY"), // Initial key
    ("TLA", "TLAN"), // Language(s)
    ("TLE", "TLEN"), // Length
    ("TMT", "TMED"), // Media type
    ("TOA", "TOPE"), // Original artist(s)/performer(s)
    ("TOF", "TOFN"), // Original filename
    ("TOL", "TOLY"), // Original Lyricist(s)/text writer(s)
    ("TOR", "TORY"), // Original release year
    ("TOT", "TOAL"), // Original album/movie/show title
    ("TP1", "TPE1"), // Lead artist(s)/Lead performer(s)/Soloist(s)/Performing group
    ("TP2", "TPE2"), // Band/Orchestra/Accompanient
    ("TP3", "TPE3"), // Conductor/Performer refinement
    ("TP4", "TPE4"), // Interpreted, remixed, or otherwise modified by
    ("TPA", "TPOS"), // Part of a set
    ("TPB", "TPUB"), // Publisher
    ("TRC", "TSRC"), // ISRC
    ("TRD", "TRDA"), // Recording dates
    ("TRK", "TRCK"), // Track
    ("TSI", "TSIZ"), // Size
    ("TSS", "TSSE"), // Software/hardware and settings used for encoding
    ("TT1", "TIT1"), // Content group description
    ("TT2", "TIT2"), // Title/Songname/Content description
    ("TT3", "TIT3"), // Subtitle/Description refinement
    ("TXT", "TEXT"), // Lyricist/text writer
    ("TXX", "TXXX"), // User-defined text
    ("TYE", "TYER"), // Year
    ("UFI", "UFID"), // Unique file identifer
    ("ULT", "USLT"), // Unsynced lyrics/text
    ("WAF", "WOAF"), // Official audio file webpage
    ("WAR", "WOAR"), // Official artist/performer webpage
    ("WAS", "WOAS"), // Official audio source webpage
    ("WCM", "WCOM"), // Commercial information
    ("WCP", "WCOP"), // Copyright information
    ("WPB", "WPUB"), // Publishers official webpage
    ("WXX", "WXXX"), // User-defined URL
    // iTunes proprietary frames
    ("PCS", "PCST"),
    ("TCP", "TCMP"),
    ("TCT", "TCAT"),
    ("TDR", "TDRL"),
    ("TDS", "TDES"),
    ("TID", "TGID"),
    ("TS2", "TSO2"),
    ("TSA", "TSOA"),
    ("TSC", "TSOC"),
    ("TSP", "TSOP"),
    ("TST", "TSOT"),
    ("WFD", "WFED"),
    ("MVN", "MVNM"),
    ("MVI", "MVIN"),
    ("GP1", "GRP1"),
];

/// Looks up the ID3v2.3 equivalent of an ID3v2.2 frame ID.
pub(crate) fn upgrade_v2_id(id: &str) -> Option<&'static str> {
    // Walk the list of pairs until an ID matches
    V2_V3_CONV
        .iter()
        .find(|(v2_id, _)| *v2_id == id)
        .map(|(_, v3_id)| *v3_id)
}
