use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One page of the public photo feed
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FeedPage {
    pub title: String,
    pub link: String,
    pub description: String,
    pub modified: String,
    pub generator: String,
    pub items: Vec<FeedItem>,
}

/// Media links of a feed item
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FeedMedia {
    /// Medium-sized image URL
    pub m: String,
}

/// A single photo in the feed
///
/// Every field defaults when missing so a partially filled item still
/// deserializes; whether it is usable is decided by the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
    pub media: FeedMedia,
    pub date_taken: String,
    pub description: String,
    pub published: String,
    /// e.g. `nobody@flickr.com ("someone")`
    pub author: String,
    pub author_id: String,
    pub tags: String,
}

impl FeedItem {
    /// Image URL, if the item has one
    pub fn image_url(&self) -> Option<&str> {
        let url = self.media.m.trim();
        if url.is_empty() {
            None
        } else {
            Some(url)
        }
    }

    /// Display name of the author
    ///
    /// The feed reports authors as `email ("name")`; the quoted part is
    /// returned. Without a quoted part the raw value is returned unchanged.
    pub fn author_name(&self) -> &str {
        let Some(last) = self.author.rfind('"') else {
            return &self.author;
        };
        match self.author[..last].rfind('"') {
            Some(first) => &self.author[first + 1..last],
            None => &self.author,
        }
    }

    /// Day the photo was taken, in the offset it was recorded with
    pub fn taken_on(&self) -> Option<NaiveDate> {
        let raw = self.date_taken.trim();
        if raw.is_empty() {
            return None;
        }

        if let Ok(date_time) = DateTime::parse_from_rfc3339(raw) {
            return Some(date_time.date_naive());
        }
        if let Ok(date_time) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
            return Some(date_time.date());
        }
        NaiveDate::parse_from_str(raw.get(..10)?, "%Y-%m-%d").ok()
    }

    /// `DD-MM-YYYY` rendering of [`FeedItem::taken_on`]
    pub fn formatted_date(&self) -> Option<String> {
        self.taken_on()
            .map(|date| date.format("%d-%m-%Y").to_string())
    }
}
