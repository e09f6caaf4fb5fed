use std::{future::Future, sync::Arc};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Client, ClientError, ClientResult, Track};

/// Something that can look up the full, detailed JSON for an album.
///
/// This is the only capability an [`Album`] needs from its client, and is
/// implemented by [`Client`].
pub trait AlbumSource {
    /// Looks up the detailed ("cirrus") payload of the album with the given ASIN.
    fn lookup_album(&self, asin: &str) -> impl Future<Output = ClientResult<Value>> + Send;
}

/// The average review score of an album.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Rating {
    /// The payload the album was built from does not carry ratings.
    #[default]
    Unknown,
    /// The payload carries ratings, but this album has none.
    Unrated,
    /// The average review score, out of 5.
    Average(f64),
}
impl Rating {
    /// The value historically used for an album with no rating.
    pub const UNRATED_SENTINEL: f64 = -1.0;

    /// The rating as a number: the average, [`Self::UNRATED_SENTINEL`] for
    /// [`Rating::Unrated`], and `None` if unknown.
    pub fn value(&self) -> Option<f64> {
        match self {
            Rating::Unknown => None,
            Rating::Unrated => Some(Self::UNRATED_SENTINEL),
            Rating::Average(average) => Some(*average),
        }
    }
}
impl Serialize for Rating {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value().serialize(serializer)
    }
}

/// The summary ("muse") album shape, as returned by listing and search endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryAlbum {
    /// The number of tracks in the album
    pub num_tracks: Option<u32>,
    /// The album metadata
    pub metadata: SummaryMetadata,
}

/// The `metadata` object of a [`SummaryAlbum`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryMetadata {
    /// The album ASIN
    pub album_asin: Option<String>,
    /// The album name
    pub album_name: Option<String>,
    /// The album artist name
    pub album_artist_name: Option<String>,
    /// The primary genre
    pub primary_genre: Option<String>,
    /// The full-size cover image URL
    pub album_cover_image_full: Option<String>,
    /// The medium-size cover image URL
    pub album_cover_image_medium: Option<String>,
}

/// The detailed ("cirrus") album shape, as returned by album lookups.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedAlbum {
    /// The album ASIN
    pub asin: Option<String>,
    /// The album title
    pub title: Option<String>,
    /// The album name, used when there is no title
    pub album_name: Option<String>,
    /// The album artist
    pub artist: Option<ArtistRef>,
    /// The album artist name, used when there is no artist object
    pub artist_name: Option<String>,
    /// The cover image URL
    pub image: Option<String>,
    /// The cover image URL, used when there is no image
    pub album_art_image_url: Option<String>,
    /// The product details
    pub product_details: Option<ProductDetails>,
    /// The reviews summary
    pub reviews: Option<Reviews>,
    /// The number of tracks
    pub track_count: Option<u32>,
    /// The number of tracks, used when there is no track count
    pub total_number_of_tracks: Option<u32>,
    /// The original release date, in milliseconds since the Unix epoch
    pub original_release_date: Option<f64>,
}

/// An artist reference embedded in a [`DetailedAlbum`].
#[derive(Debug, Clone, Deserialize)]
pub struct ArtistRef {
    /// The artist name
    pub name: Option<String>,
}

/// The product details of a [`DetailedAlbum`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetails {
    /// The primary genre name
    pub primary_genre_name: Option<String>,
}

/// The reviews summary of a [`DetailedAlbum`].
#[derive(Debug, Clone, Deserialize)]
pub struct Reviews {
    /// The average review score, out of 5
    pub average: Option<f64>,
}

/// Which of the two album shapes an album was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AlbumShape {
    /// The summary ("muse") shape.
    Summary,
    /// The detailed ("cirrus") shape.
    Detailed,
}

/// An album payload, in one of the two shapes the API uses.
#[derive(Debug, Clone)]
pub enum AlbumPayload {
    /// A summary, lacking track listings.
    Summary {
        /// The parsed summary
        album: SummaryAlbum,
        /// The `metadata` object, as received
        json: Value,
    },
    /// A full album, which may include track listings.
    Detailed {
        /// The parsed album
        album: DetailedAlbum,
        /// The album, as received
        json: Value,
    },
}
impl AlbumPayload {
    /// Parses raw album JSON. Payloads with a `metadata` key are summaries;
    /// everything else is treated as detailed.
    pub fn from_json(mut data: Value) -> ClientResult<Self> {
        if data.get("metadata").is_some() {
            let album = SummaryAlbum::deserialize(&data)?;
            let json = data
                .get_mut("metadata")
                .map(Value::take)
                .unwrap_or_default();
            Ok(AlbumPayload::Summary { album, json })
        } else {
            let album = DetailedAlbum::deserialize(&data)?;
            Ok(AlbumPayload::Detailed { album, json: data })
        }
    }

    /// The shape of this payload.
    pub fn shape(&self) -> AlbumShape {
        match self {
            AlbumPayload::Summary { .. } => AlbumShape::Summary,
            AlbumPayload::Detailed { .. } => AlbumShape::Detailed,
        }
    }

    /// Maps either shape onto the uniform album attributes, returning them
    /// with the JSON to retain.
    pub fn normalize(self) -> ClientResult<(AlbumInfo, Value)> {
        fn required<T>(value: Option<T>, field: &'static str) -> ClientResult<T> {
            value.ok_or(ClientError::MissingField { field })
        }
        // Empty strings fall through to the fallback, as absent ones do.
        fn text(value: Option<String>) -> Option<String> {
            value.filter(|s| !s.is_empty())
        }

        match self {
            AlbumPayload::Summary { album, json } => {
                let metadata = album.metadata;
                let info = AlbumInfo {
                    id: required(metadata.album_asin, "metadata.albumAsin")?,
                    name: required(metadata.album_name, "metadata.albumName")?,
                    artist: required(metadata.album_artist_name, "metadata.albumArtistName")?,
                    cover_url: metadata
                        .album_cover_image_full
                        .or(metadata.album_cover_image_medium),
                    genre: metadata.primary_genre,
                    rating: Rating::Unknown,
                    track_count: required(album.num_tracks, "numTracks")?,
                    release_date: None,
                };
                Ok((info, json))
            }
            AlbumPayload::Detailed { album, json } => {
                let artist = album
                    .artist
                    .and_then(|artist| text(artist.name))
                    .or(album.artist_name);
                let rating = match album.reviews.and_then(|reviews| reviews.average) {
                    Some(average) if average != 0.0 => Rating::Average(average),
                    _ => Rating::Unrated,
                };
                let track_count = album
                    .track_count
                    .filter(|count| *count > 0)
                    .or(album.total_number_of_tracks)
                    .or(album.track_count);

                let info = AlbumInfo {
                    id: required(album.asin, "asin")?,
                    name: required(text(album.title).or(album.album_name), "title/albumName")?,
                    artist: required(artist, "artist.name/artistName")?,
                    cover_url: text(album.image).or(album.album_art_image_url),
                    genre: album
                        .product_details
                        .and_then(|details| details.primary_genre_name),
                    rating,
                    track_count: required(track_count, "trackCount/totalNumberOfTracks")?,
                    release_date: album
                        .original_release_date
                        .map(|ms| (ms / 1000.0).floor() as i64),
                };
                Ok((info, json))
            }
        }
    }
}

/// The normalized attributes of an album, whichever shape it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumInfo {
    /// The album ASIN
    pub id: String,
    /// The album name
    pub name: String,
    /// The album artist name
    pub artist: String,
    /// The cover art URL
    pub cover_url: Option<String>,
    /// The primary genre
    pub genre: Option<String>,
    /// The average review score
    pub rating: Rating,
    /// The number of tracks in the album
    pub track_count: u32,
    /// The original release date, in seconds since the Unix epoch
    pub release_date: Option<i64>,
}

/// A streamable album.
///
/// Built from either album shape; if it was built from a summary, the first
/// call to [`Album::tracks`] looks the full album up through its source and
/// replaces its attributes with the detailed ones.
pub struct Album<S = Client> {
    source: Arc<S>,
    shape: AlbumShape,
    info: AlbumInfo,
    json: Value,
}
impl<S> Album<S> {
    /// Builds an album from raw JSON in either shape. `source` is shared with
    /// the caller and only used to look up the full album later.
    ///
    /// # Errors
    ///
    /// Returns an error if a required field is missing or has the wrong type.
    pub fn from_json(source: Arc<S>, data: Value) -> ClientResult<Self> {
        let payload = AlbumPayload::from_json(data)?;
        let shape = payload.shape();
        let (info, json) = payload.normalize()?;
        Ok(Album {
            source,
            shape,
            info,
            json,
        })
    }

    /// The normalized attributes of the album.
    pub fn info(&self) -> &AlbumInfo {
        &self.info
    }

    /// The album ASIN.
    pub fn id(&self) -> &str {
        &self.info.id
    }

    /// The album name.
    pub fn name(&self) -> &str {
        &self.info.name
    }

    /// The album artist name.
    pub fn artist(&self) -> &str {
        &self.info.artist
    }

    /// The cover art URL.
    pub fn cover_url(&self) -> Option<&str> {
        self.info.cover_url.as_deref()
    }

    /// The primary genre.
    pub fn genre(&self) -> Option<&str> {
        self.info.genre.as_deref()
    }

    /// The average review score.
    pub fn rating(&self) -> Rating {
        self.info.rating
    }

    /// The number of tracks in the album.
    pub fn track_count(&self) -> u32 {
        self.info.track_count
    }

    /// The original release date, in seconds since the Unix epoch.
    pub fn release_date(&self) -> Option<i64> {
        self.info.release_date
    }

    /// The original release date.
    pub fn released_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.info
            .release_date
            .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0))
    }

    /// The retained JSON: the `metadata` object for summaries, or the whole
    /// album otherwise.
    pub fn json(&self) -> &Value {
        &self.json
    }

    /// Whether the retained JSON carries a track listing.
    pub fn has_tracks(&self) -> bool {
        self.json.get("tracks").is_some_and(Value::is_array)
    }

    /// The shape the album's current attributes came from.
    pub fn shape(&self) -> AlbumShape {
        self.shape
    }

    /// Whether the album was built from (and is still) a summary.
    pub fn is_summary(&self) -> bool {
        self.shape == AlbumShape::Summary
    }
}
impl<S: AlbumSource> Album<S> {
    /// The tracks of the album, in order.
    ///
    /// If only summary data has been loaded, the full album is looked up first
    /// and replaces this album's attributes. This happens at most once; if the
    /// lookup fails, the album is left as it was.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails, or if it does not return a valid
    /// album with a track listing.
    pub async fn tracks(&mut self) -> ClientResult<Vec<Track>> {
        if !self.has_tracks() {
            tracing::debug!("album {} has no track listing, looking it up", self.info.id);
            let data = self.source.lookup_album(&self.info.id).await?;
            let payload = AlbumPayload::from_json(data)?;
            let shape = payload.shape();
            let (info, json) = payload.normalize()?;
            if !json.get("tracks").is_some_and(Value::is_array) {
                return Err(ClientError::MissingField { field: "tracks" });
            }
            self.shape = shape;
            self.info = info;
            self.json = json;
        }

        let tracks = self
            .json
            .get("tracks")
            .and_then(Value::as_array)
            .ok_or(ClientError::MissingField { field: "tracks" })?;
        Ok(tracks.iter().cloned().map(Track::from_json).collect())
    }
}
impl<S> Clone for Album<S> {
    fn clone(&self) -> Self {
        Album {
            source: self.source.clone(),
            shape: self.shape,
            info: self.info.clone(),
            json: self.json.clone(),
        }
    }
}
impl<S> std::fmt::Debug for Album<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Album")
            .field("shape", &self.shape)
            .field("info", &self.info)
            .field("has_tracks", &self.has_tracks())
            .finish_non_exhaustive()
    }
}
impl<S> Serialize for Album<S> {
    fn serialize<Ser: serde::Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        self.info.serialize(serializer)
    }
}

const LOOKUP_ENDPOINT: &str = "muse/legacy/lookup";
const LOOKUP_TARGET: &str = "com.amazon.musicensembleservice.MusicEnsembleService.lookup";

/// Album-related endpoints.
impl Client {
    /// Look up the detailed JSON for an album, including its track listing.
    pub async fn lookup_album_json(&self, asin: impl Into<String>) -> ClientResult<Value> {
        let asin = asin.into();

        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct LookupRequest<'a> {
            asins: [&'a str; 1],
            features: [&'static str; 4],
            requested_content: &'static str,
            device_id: &'a str,
            device_type: &'a str,
            music_territory: &'a str,
            customer_id: &'a str,
        }

        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct LookupResponse {
            #[serde(default)]
            album_list: Vec<Value>,
        }

        let session = &self.session;
        let request = LookupRequest {
            asins: [&asin],
            features: [
                "popularity",
                "expandTracklist",
                "trackLibraryAvailability",
                "collectionLibraryAvailability",
            ],
            requested_content: "MUSIC_SUBSCRIPTION",
            device_id: &session.device_id,
            device_type: &session.device_type,
            music_territory: &session.territory,
            customer_id: &session.customer_id,
        };

        self.call::<LookupResponse>(LOOKUP_ENDPOINT, LOOKUP_TARGET, &request)
            .await?
            .album_list
            .into_iter()
            .next()
            .ok_or(ClientError::NotFound { asin })
    }

    /// Get a specific album with its tracks.
    pub async fn get_album(self: &Arc<Self>, asin: impl Into<String>) -> ClientResult<Album> {
        let data = self.lookup_album_json(asin).await?;
        Album::from_json(self.clone(), data)
    }
}
impl AlbumSource for Client {
    async fn lookup_album(&self, asin: &str) -> ClientResult<Value> {
        self.lookup_album_json(asin).await
    }
}
