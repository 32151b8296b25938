use serde::Deserialize;

const STYLE_API: &str = "/api/map/style";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StyleResponse {
    success: bool,
    #[serde(default)]
    style: serde_json::Value,
}

/// Fetch the vector-map style document from the backend.
///
/// # Errors
///
/// Returns an error if:
/// - The HTTP request fails
/// - The response body cannot be deserialized
/// - The service reports `success: false`
pub async fn fetch_map_style() -> Result<serde_json::Value, String> {
    let response = reqwest::get(STYLE_API)
        .await
        .map_err(|e| format!("Style request failed: {e}"))?
        .json::<StyleResponse>()
        .await
        .map_err(|e| format!("Failed to deserialize style: {e}"))?;

    if !response.success || response.style.is_null() {
        return Err("Style service reported failure".to_string());
    }
    Ok(response.style)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_response_parses_success_payload() {
        let json = r#"{"success": true, "style": {"version": 8, "layers": []}}"#;
        let response: StyleResponse = serde_json::from_str(json).expect("deserialize");
        assert!(response.success);
        assert_eq!(response.style["version"], 8);
    }

    #[test]
    fn test_style_response_tolerates_missing_style_on_failure() {
        let json = r#"{"success": false}"#;
        let response: StyleResponse = serde_json::from_str(json).expect("deserialize");
        assert!(!response.success);
        assert!(response.style.is_null());
    }
}
