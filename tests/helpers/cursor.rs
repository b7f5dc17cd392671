//! Cursor markers.
//!
//! A marker is a snippet of the source text, optionally with a `|` where
//! the cursor goes: `"p.|x"` puts the cursor on `x` of the first `p.x`.
//! Without a `|` the cursor sits on the marker's first character.

use ton_analyzer::base::FileId;
use ton_analyzer::ide::AnalysisHost;

/// Byte offset of `marker` in `text`.
pub fn offset_of(text: &str, marker: &str) -> u32 {
    let bar = marker.find('|').unwrap_or(0);
    let needle = marker.replace('|', "");
    let at = text
        .find(&needle)
        .unwrap_or_else(|| panic!("marker '{marker}' not found"));
    (at + bar) as u32
}

/// Line/column of `marker` in the file `uri` of `host`.
pub fn position(host: &AnalysisHost, uri: &str, marker: &str) -> (FileId, u32, u32) {
    let file = host
        .workspace()
        .file_by_uri(uri)
        .unwrap_or_else(|| panic!("'{uri}' is not loaded"));
    let pos = file
        .line_index()
        .position(offset_of(file.text(), marker).into());
    (file.id(), pos.line, pos.column)
}
