use serde::{Deserialize, Serialize};

#[allow(unused_imports)]
use crate::logging::log;

const REVERSE_GEOCODE_API: &str = "/api/map/reverse-geocode";

/// A clicked coordinate with whatever address the geocoder could resolve.
/// Handed to the click callbacks; the surrounding page decides what the
/// point means.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeocodedLocation {
    pub lat: f64,
    pub lng: f64,
    pub address: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeocodeResponse {
    success: bool,
    #[serde(default)]
    address: Option<String>,
}

/// Resolve an address for a clicked coordinate.
///
/// Never fails the interaction: any request or decode error degrades to a
/// location with an empty address.
pub async fn reverse_geocode(lat: f64, lng: f64) -> GeocodedLocation {
    let address = match request_address(lat, lng).await {
        Ok(address) => address,
        Err(err) => {
            log!("Reverse geocoding failed: {err}");
            String::new()
        }
    };
    GeocodedLocation { lat, lng, address }
}

async fn request_address(lat: f64, lng: f64) -> Result<String, String> {
    let url = format!("{REVERSE_GEOCODE_API}?lat={lat}&lng={lng}");
    let response = reqwest::get(&url)
        .await
        .map_err(|e| format!("Request failed: {e}"))?
        .json::<GeocodeResponse>()
        .await
        .map_err(|e| format!("Failed to deserialize: {e}"))?;

    if !response.success {
        return Err("Geocoding service reported failure".to_string());
    }
    Ok(response.address.unwrap_or_default())
}
