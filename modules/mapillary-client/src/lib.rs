pub mod error;
pub mod types;

pub use error::{MapillaryError, Result};
pub use types::{Geometry, ImageMeta, ImagesResponse};

const BASE_URL: &str = "https://graph.mapillary.com";

pub struct MapillaryClient {
    client: reqwest::Client,
    token: String,
}

impl MapillaryClient {
    pub fn new(token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            token,
        }
    }

    /// Search for panoramic images inside a bounding box.
    /// Bbox order is `min_lng,min_lat,max_lng,max_lat`.
    pub async fn images_in_bbox(&self, bbox: &[f64; 4], limit: u32) -> Result<Vec<ImageMeta>> {
        let bbox_param = bbox
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",");

        let url = format!("{BASE_URL}/images");
        let resp = self
            .client
            .get(&url)
            .query(&[
                ("access_token", self.token.as_str()),
                ("fields", "id,computed_geometry"),
                ("limit", &limit.to_string()),
                ("is_pano", "true"),
                ("bbox", &bbox_param),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(MapillaryError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let parsed: ImagesResponse = resp.json().await?;
        tracing::debug!(count = parsed.data.len(), bbox = %bbox_param, "Image search complete");
        Ok(parsed.data)
    }

    /// Fetch metadata for a single image by id. Errors on unknown ids, which
    /// is how callers detect an unloadable panorama.
    pub async fn image_meta(&self, id: &str) -> Result<ImageMeta> {
        let url = format!("{BASE_URL}/{id}");
        let resp = self
            .client
            .get(&url)
            .query(&[
                ("access_token", self.token.as_str()),
                ("fields", "id,computed_geometry,thumb_1024_url"),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(MapillaryError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(resp.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_images_envelope() {
        let json = r#"{
            "data": [
                {"id": "101", "computed_geometry": {"type": "Point", "coordinates": [2.3522, 48.8566]}},
                {"id": "102"}
            ]
        }"#;
        let parsed: ImagesResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.data.len(), 2);
        assert_eq!(parsed.data[0].lat_lng(), Some((48.8566, 2.3522)));
        assert_eq!(parsed.data[1].lat_lng(), None);
    }

    #[test]
    fn parses_empty_envelope() {
        let parsed: ImagesResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.data.is_empty());
    }
}
