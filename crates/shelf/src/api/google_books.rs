use std::{error::Error as StdError, fmt};

use log::{debug, info, trace, warn};
use serde::{
    de::{self, IgnoredAny, SeqAccess, Visitor},
    Deserialize, Deserializer,
};

use crate::Error;

use super::Client;

const GOOGLE_BOOKS_URL: &str = "https://www.googleapis.com/books/v1/volumes?q=intitle:";

const ISBN_13: &str = "ISBN_13";
const ISBN_10: &str = "ISBN_10";

/// Resolves ISBNs for book titles using the Google Books volume search.
///
/// The client owns its HTTP client instance; nothing is shared between lookups other than the
/// connection pool of that instance.
pub struct MetadataClient<C: Client = reqwest::blocking::Client> {
    client: C,
}

impl MetadataClient {
    /// Create a [`MetadataClient`] backed by a default blocking `reqwest` client.
    #[must_use]
    pub fn new() -> Self {
        Self::with_client(reqwest::blocking::Client::new())
    }
}

impl Default for MetadataClient {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Client> MetadataClient<C> {
    /// Create a [`MetadataClient`] using the given [`Client`].
    pub const fn with_client(client: C) -> Self {
        Self { client }
    }

    /// Best effort ISBN lookup for `title`.
    ///
    /// Any failure from [`MetadataClient::lookup_isbn`] is logged and reported as `None`, a failed
    /// lookup is never fatal to the caller.
    pub fn fetch_isbn(&self, title: &str) -> Option<String> {
        match self.lookup_isbn(title) {
            Ok(isbn) => isbn,
            Err(err) => {
                warn!("Error fetching ISBN: {err}");
                let mut source = err.source();
                while let Some(cause) = source {
                    debug!("caused by: {cause}");
                    source = cause.source();
                }
                None
            }
        }
    }

    /// Look up the preferred ISBN of the first volume matching `title`.
    ///
    /// `Ok(None)` means the search succeeded but produced no volume or no ISBN identifier.
    ///
    /// # Errors
    ///
    /// An `Err` is returned when the request fails, the API answers with a non-success status or
    /// the response cannot be deserialized.
    pub fn lookup_isbn(&self, title: &str) -> Result<Option<String>, Error> {
        info!("Searching for title '{title}' using Google Books API");
        let url = search_url(title);

        let VolumeSearch { first_item } = self.client.get_json(&url)?;
        trace!("Request was successful");

        let isbn = first_item
            .map(|item| item.volume_info.industry_identifiers)
            .and_then(|identifiers| preferred_isbn(identifiers.unwrap_or_default()));

        match &isbn {
            Some(isbn) => trace!("Resolved '{title}' to ISBN '{isbn}'"),
            None => trace!("No ISBN identifiers found for '{title}'"),
        }

        Ok(isbn)
    }
}

fn search_url(title: &str) -> String {
    let mut url = GOOGLE_BOOKS_URL.to_owned();
    url.push_str(&title.trim().replace(' ', "+"));
    url
}

/// Pick the last ISBN-13, falling back to the last ISBN-10.
fn preferred_isbn(identifiers: Vec<IndustryIdentifier>) -> Option<String> {
    let (mut isbn_13, mut isbn_10) = (None, None);
    for IndustryIdentifier { kind, identifier } in identifiers {
        match kind.as_str() {
            ISBN_13 => isbn_13 = Some(identifier),
            ISBN_10 => isbn_10 = Some(identifier),
            _ => {}
        }
    }
    isbn_13.or(isbn_10)
}

/// Deserialize only the first volume of `items`, the remaining volumes are skipped unread.
fn first_item<'de, D>(deserializer: D) -> Result<Option<Item>, D::Error>
where
    D: Deserializer<'de>,
{
    struct FirstItem;

    impl<'de> Visitor<'de> for FirstItem {
        type Value = Option<Item>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a list of volumes")
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<S>(self, deserializer: S) -> Result<Self::Value, S::Error>
        where
            S: Deserializer<'de>,
        {
            deserializer.deserialize_seq(self)
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: SeqAccess<'de>,
        {
            let first = seq.next_element()?;
            while seq.next_element::<IgnoredAny>()?.is_some() {}
            Ok(first)
        }
    }

    deserializer.deserialize_option(FirstItem)
}

#[derive(Deserialize)]
#[cfg_attr(test, derive(Debug))]
struct VolumeSearch {
    #[serde(rename = "items", default, deserialize_with = "first_item")]
    first_item: Option<Item>,
}

#[derive(Deserialize)]
#[cfg_attr(test, derive(Debug))]
struct Item {
    #[serde(rename = "volumeInfo")]
    volume_info: VolumeInfo,
}

/// Volume information from the Google Book API, only the identifiers are of interest.
#[derive(Deserialize)]
#[cfg_attr(test, derive(Debug))]
struct VolumeInfo {
    #[serde(rename = "industryIdentifiers")]
    industry_identifiers: Option<Vec<IndustryIdentifier>>,
}

#[derive(Deserialize)]
#[cfg_attr(test, derive(Debug))]
struct IndustryIdentifier {
    #[serde(rename = "type")]
    kind: String,
    identifier: String,
}
