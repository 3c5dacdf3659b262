use anyhow::{Context, Result};

use crate::provider::Coordinates;

/// Map search URL centered on a point.
pub fn maps_url(coordinates: &Coordinates) -> String {
    format!(
        "https://www.google.com/maps/search/?api=1&query={:.6},{:.6}",
        coordinates.lat, coordinates.lon
    )
}

/// Open a URL in the user's default browser
///
/// # Errors
/// Returns error if browser cannot be opened (e.g., no browser available)
pub fn open_url(url: &str) -> Result<()> {
    webbrowser::open(url).with_context(|| format!("Failed to open browser for URL: {}", url))?;
    Ok(())
}
