use serde::Deserialize;

/// Envelope for collection endpoints: `{ "data": [...] }`.
#[derive(Debug, Deserialize)]
pub struct ImagesResponse {
    #[serde(default)]
    pub data: Vec<ImageMeta>,
}

/// One image entry from the Graph API. `computed_geometry` is absent for
/// images the backend has not localized yet.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageMeta {
    pub id: String,
    pub computed_geometry: Option<Geometry>,
    pub thumb_1024_url: Option<String>,
}

/// GeoJSON point. Coordinates are `[lng, lat]`.
#[derive(Debug, Clone, Deserialize)]
pub struct Geometry {
    pub coordinates: [f64; 2],
}

impl ImageMeta {
    /// Latitude/longitude if the image has computed geometry.
    pub fn lat_lng(&self) -> Option<(f64, f64)> {
        self.computed_geometry
            .as_ref()
            .map(|g| (g.coordinates[1], g.coordinates[0]))
    }
}
