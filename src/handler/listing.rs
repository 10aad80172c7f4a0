//! Directory listing module
//!
//! Renders an HTML index for directories that have no index file.

use percent_encoding::{percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::ffi::{OsStr, OsString};
use std::io;
use std::path::Path;
use tokio::fs;

/// Characters left as-is in hrefs: unreserved plus `/`
const HREF_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');

/// One directory entry as shown in the listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    /// Display name, lossily converted when not UTF-8
    pub name: String,
    /// Name as stored on disk, used for the href
    pub raw_name: OsString,
    /// Target is a directory (symlinks followed)
    pub is_dir: bool,
    pub is_symlink: bool,
}

impl ListingEntry {
    pub fn new(raw_name: OsString, is_dir: bool, is_symlink: bool) -> Self {
        Self {
            name: raw_name.to_string_lossy().into_owned(),
            raw_name,
            is_dir,
            is_symlink,
        }
    }

    /// Visible label: `name/` for directories, `name@` for symlinks
    pub fn label(&self) -> String {
        if self.is_symlink {
            format!("{}@", self.name)
        } else if self.is_dir {
            format!("{}/", self.name)
        } else {
            self.name.clone()
        }
    }

    /// Relative link target, percent-encoded
    pub fn href(&self) -> String {
        let mut link = name_bytes(&self.raw_name);
        if self.is_dir {
            link.push(b'/');
        }
        percent_encode(&link, HREF_ENCODE_SET).to_string()
    }
}

#[cfg(unix)]
fn name_bytes(name: &OsStr) -> Vec<u8> {
    use std::os::unix::ffi::OsStrExt;
    name.as_bytes().to_vec()
}

#[cfg(not(unix))]
fn name_bytes(name: &OsStr) -> Vec<u8> {
    name.to_string_lossy().into_owned().into_bytes()
}

/// Read `dir` and return its entries sorted case-insensitively
pub async fn read_listing(dir: &Path) -> io::Result<Vec<ListingEntry>> {
    let mut read_dir = fs::read_dir(dir).await?;
    let mut entries = Vec::new();

    while let Some(entry) = read_dir.next_entry().await? {
        let is_symlink = entry
            .file_type()
            .await
            .is_ok_and(|t| t.is_symlink());
        // Dangling symlinks are listed as plain entries
        let is_dir = fs::metadata(entry.path())
            .await
            .is_ok_and(|m| m.is_dir());
        entries.push(ListingEntry::new(entry.file_name(), is_dir, is_symlink));
    }

    entries.sort_by_cached_key(|e| e.name.to_lowercase());
    Ok(entries)
}

/// Render the listing page for `display_path` (the decoded request path)
pub fn render_listing(display_path: &str, entries: &[ListingEntry]) -> String {
    let title = format!("Directory listing for {}", escape_html(display_path));

    let mut html = String::with_capacity(256 + entries.len() * 64);
    html.push_str("<!DOCTYPE HTML>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{title}</title>\n</head>\n<body>\n"));
    html.push_str(&format!("<h1>{title}</h1>\n<hr>\n<ul>\n"));
    for entry in entries {
        html.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>\n",
            entry.href(),
            escape_html(&entry.label())
        ));
    }
    html.push_str("</ul>\n<hr>\n</body>\n</html>\n");
    html
}

/// Escape text for HTML element content and attribute values
fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
