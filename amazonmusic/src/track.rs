use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

/// A track on an album, as much as can be told from its raw JSON.
///
/// Track entries vary between endpoints, so every attribute is optional and
/// the raw JSON is kept alongside.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// The track ASIN
    pub id: Option<String>,
    /// The track title
    pub name: Option<String>,
    /// The track artist name
    pub artist: Option<String>,
    /// The duration in seconds
    pub duration: Option<u32>,
    /// The track number
    pub track_number: Option<u32>,
    /// The disc number
    pub disc_number: Option<u32>,
    /// The track's JSON, as received
    #[serde(skip)]
    pub json: Value,
}
impl Track {
    /// Builds a track from one entry of an album's `tracks` array.
    pub fn from_json(json: Value) -> Self {
        // Parsed per field, so a badly-typed field only loses itself.
        fn field<T: DeserializeOwned>(json: &Value, key: &str) -> Option<T> {
            json.get(key)
                .and_then(|value| serde_json::from_value(value.clone()).ok())
        }
        fn text(json: &Value, key: &str) -> Option<String> {
            field::<String>(json, key).filter(|s| !s.is_empty())
        }

        let artist = json
            .get("artist")
            .and_then(|artist| text(artist, "name"))
            .or_else(|| text(&json, "artistName"));

        Track {
            id: text(&json, "asin"),
            name: text(&json, "title"),
            artist,
            duration: field(&json, "duration"),
            track_number: field(&json, "trackNum").or_else(|| field(&json, "trackNumber")),
            disc_number: field(&json, "discNum"),
            json,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_from_json() {
        let track = Track::from_json(json!({
            "asin": "B00T1",
            "title": "Opener",
            "artist": { "name": "The Band" },
            "artistName": "Someone Else",
            "duration": 215,
            "trackNum": 1,
            "discNum": 1
        }));

        assert_eq!(track.id.as_deref(), Some("B00T1"));
        assert_eq!(track.name.as_deref(), Some("Opener"));
        assert_eq!(track.artist.as_deref(), Some("The Band"));
        assert_eq!(track.duration, Some(215));
        assert_eq!(track.track_number, Some(1));
        assert_eq!(track.disc_number, Some(1));
    }

    #[test]
    fn test_from_json_sparse() {
        let track = Track::from_json(json!({
            "title": "Untitled",
            "artistName": "Fallback",
            "duration": "not a number",
            "trackNumber": 7
        }));

        assert_eq!(track.id, None);
        assert_eq!(track.artist.as_deref(), Some("Fallback"));
        assert_eq!(track.duration, None);
        assert_eq!(track.track_number, Some(7));
        assert_eq!(track.json["title"], "Untitled");
    }
}
