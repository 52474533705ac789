use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
    #[serde(other)]
    Other,
}

/// Astronomy Picture of the Day payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApodRecord {
    pub title: String,
    pub explanation: String,
    pub date: NaiveDate,
    /// Absent for public-domain images.
    #[serde(default)]
    pub copyright: Option<String>,
    pub url: String,
    #[serde(default)]
    pub hdurl: Option<String>,
    pub media_type: MediaType,
    #[serde(default)]
    pub service_version: Option<String>,
}

impl ApodRecord {
    /// High resolution variant when present, otherwise the regular url.
    pub fn display_url(&self) -> &str {
        self.hdurl
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(&self.url)
    }

    pub fn credit(&self) -> String {
        match self
            .copyright
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            Some(who) => format!("by {}, {}", who.replace('\n', " "), self.date),
            None => self.date.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_image_payload_with_extra_fields() {
        let v = json!({
            "copyright": "\nJane Doe\n",
            "date": "2026-10-18",
            "explanation": "A nebula.",
            "hdurl": "https://apod.nasa.gov/apod/image/2610/nebula_big.jpg",
            "media_type": "image",
            "service_version": "v1",
            "title": "Nebula",
            "url": "https://apod.nasa.gov/apod/image/2610/nebula.jpg",
            "concept_tags": true,
            "concepts": {}
        });

        let apod: ApodRecord = serde_json::from_value(v).unwrap();
        assert_eq!(apod.media_type, MediaType::Image);
        assert_eq!(
            apod.display_url(),
            "https://apod.nasa.gov/apod/image/2610/nebula_big.jpg"
        );
        assert_eq!(apod.credit(), "by Jane Doe, 2026-10-18");
    }

    #[test]
    fn video_without_copyright_or_hdurl() {
        let v = json!({
            "date": "2026-10-17",
            "explanation": "A flyby.",
            "media_type": "video",
            "title": "Flyby",
            "url": "https://www.youtube.com/embed/abc"
        });

        let apod: ApodRecord = serde_json::from_value(v).unwrap();
        assert_eq!(apod.media_type, MediaType::Video);
        assert_eq!(apod.display_url(), "https://www.youtube.com/embed/abc");
        assert_eq!(apod.credit(), "2026-10-17");
        assert!(apod.service_version.is_none());
    }

    #[test]
    fn unknown_media_type_is_tolerated() {
        let v = json!({
            "date": "2026-10-16",
            "explanation": "",
            "media_type": "other",
            "title": "Interactive",
            "url": "https://apod.nasa.gov/apod/ap261016.html"
        });

        let apod: ApodRecord = serde_json::from_value(v).unwrap();
        assert_eq!(apod.media_type, MediaType::Other);
    }
}
