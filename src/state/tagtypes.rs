//! Tag types a connection wants to see in song listings.

use std::collections::BTreeSet;
use thiserror::Error;

/// Every tag type the server can report, in listing order.
pub const TAG_TYPES: &[&str] = &[
    "Artist",
    "ArtistSort",
    "Album",
    "AlbumSort",
    "AlbumArtist",
    "AlbumArtistSort",
    "Title",
    "Track",
    "Name",
    "Genre",
    "Date",
    "Composer",
    "Performer",
    "Comment",
    "Disc",
    "MUSICBRAINZ_ARTISTID",
    "MUSICBRAINZ_ALBUMID",
    "MUSICBRAINZ_ALBUMARTISTID",
    "MUSICBRAINZ_TRACKID",
    "MUSICBRAINZ_RELEASETRACKID",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown tag type: {0}")]
pub struct UnknownTag(pub String);

/// The enabled subset of [`TAG_TYPES`], stored by index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagTypes {
    enabled: BTreeSet<usize>,
}

impl Default for TagTypes {
    fn default() -> Self {
        Self::all()
    }
}

impl TagTypes {
    pub fn all() -> Self {
        Self {
            enabled: (0..TAG_TYPES.len()).collect(),
        }
    }

    pub fn enable_all(&mut self) {
        *self = Self::all();
    }

    pub fn clear(&mut self) {
        self.enabled.clear();
    }

    /// Enable the named tags. Nothing changes if any name is unknown.
    pub fn enable<S: AsRef<str>>(&mut self, names: &[S]) -> Result<(), UnknownTag> {
        let indices = lookup_all(names)?;
        self.enabled.extend(indices);
        Ok(())
    }

    /// Disable the named tags. Nothing changes if any name is unknown.
    pub fn disable<S: AsRef<str>>(&mut self, names: &[S]) -> Result<(), UnknownTag> {
        for index in lookup_all(names)? {
            self.enabled.remove(&index);
        }
        Ok(())
    }

    /// Enabled tags in listing order.
    pub fn iter(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.enabled.iter().map(|&i| TAG_TYPES[i])
    }

    /// Whether `key` is a tag type the connection has switched off.
    ///
    /// Keys that are not tag types at all (`file`, `Pos`, ...) are never
    /// considered disabled.
    pub fn is_disabled(&self, key: &str) -> bool {
        lookup(key).is_some_and(|i| !self.enabled.contains(&i))
    }
}

fn lookup(name: &str) -> Option<usize> {
    TAG_TYPES.iter().position(|t| t.eq_ignore_ascii_case(name))
}

fn lookup_all<S: AsRef<str>>(names: &[S]) -> Result<Vec<usize>, UnknownTag> {
    names
        .iter()
        .map(|n| lookup(n.as_ref()).ok_or_else(|| UnknownTag(n.as_ref().to_owned())))
        .collect()
}
