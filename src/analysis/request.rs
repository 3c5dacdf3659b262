use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RequestError;
use crate::scoring::PriceTier;

/// Search radius around the requested location.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Radius {
    #[serde(rename = "0.5 mile")]
    HalfMile,
    #[default]
    #[serde(rename = "1 mile")]
    OneMile,
    #[serde(rename = "3 miles")]
    ThreeMiles,
}

impl Radius {
    pub fn meters(&self) -> u32 {
        match self {
            Radius::HalfMile => 804,
            Radius::OneMile => 1609,
            Radius::ThreeMiles => 4828,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Radius::HalfMile => "0.5 mile",
            Radius::OneMile => "1 mile",
            Radius::ThreeMiles => "3 miles",
        }
    }
}

impl FromStr for Radius {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        let number = normalized
            .trim_end_matches("miles")
            .trim_end_matches("mile")
            .trim_end_matches("mi")
            .trim();
        match number {
            "0.5" | ".5" | "half" | "1/2" => Ok(Radius::HalfMile),
            "1" | "one" => Ok(Radius::OneMile),
            "3" | "three" => Ok(Radius::ThreeMiles),
            _ => Err(RequestError::UnknownRadius(s.to_string())),
        }
    }
}

impl fmt::Display for Radius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// When the business mainly operates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Daypart {
    Day,
    Evening,
    #[default]
    Both,
}

impl Daypart {
    pub fn as_str(&self) -> &'static str {
        match self {
            Daypart::Day => "day",
            Daypart::Evening => "evening",
            Daypart::Both => "both",
        }
    }
}

impl FromStr for Daypart {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" | "daytime" => Ok(Daypart::Day),
            "evening" | "night" => Ok(Daypart::Evening),
            "both" | "all day" => Ok(Daypart::Both),
            _ => Err(RequestError::UnknownDaypart(s.to_string())),
        }
    }
}

impl fmt::Display for Daypart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the user wants analyzed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub business: String,
    pub location: String,
    #[serde(default)]
    pub radius: Radius,
    #[serde(default)]
    pub price_tier: PriceTier,
    #[serde(default)]
    pub daypart: Daypart,
}

impl AnalysisRequest {
    pub fn new(business: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            business: business.into(),
            location: location.into(),
            radius: Radius::default(),
            price_tier: PriceTier::default(),
            daypart: Daypart::default(),
        }
    }

    /// Reject requests missing their identifying fields.
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.business.trim().is_empty() {
            return Err(RequestError::MissingBusiness);
        }
        if self.location.trim().is_empty() {
            return Err(RequestError::MissingLocation);
        }
        Ok(())
    }
}

/// Strict price tier parse for user-facing flags.
pub fn parse_price_tier(s: &str) -> Result<PriceTier, RequestError> {
    s.parse::<PriceTier>()
        .map_err(|_| RequestError::UnknownPriceTier(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radius_parse_variants() {
        assert_eq!("1 mile".parse::<Radius>().unwrap(), Radius::OneMile);
        assert_eq!("3 miles".parse::<Radius>().unwrap(), Radius::ThreeMiles);
        assert_eq!("0.5 mile".parse::<Radius>().unwrap(), Radius::HalfMile);
        assert_eq!("3mi".parse::<Radius>().unwrap(), Radius::ThreeMiles);
        assert_eq!("1".parse::<Radius>().unwrap(), Radius::OneMile);
        assert_eq!(
            "10 miles".parse::<Radius>().unwrap_err(),
            RequestError::UnknownRadius("10 miles".to_string())
        );
    }

    #[test]
    fn test_radius_meters() {
        assert_eq!(Radius::HalfMile.meters(), 804);
        assert_eq!(Radius::OneMile.meters(), 1609);
        assert_eq!(Radius::ThreeMiles.meters(), 4828);
    }

    #[test]
    fn test_daypart_parse() {
        assert_eq!("Evening".parse::<Daypart>().unwrap(), Daypart::Evening);
        assert_eq!("all day".parse::<Daypart>().unwrap(), Daypart::Both);
        assert!("brunch".parse::<Daypart>().is_err());
    }

    #[test]
    fn test_validate_requires_business_and_location() {
        assert_eq!(
            AnalysisRequest::new("  ", "Boston").validate(),
            Err(RequestError::MissingBusiness)
        );
        assert_eq!(
            AnalysisRequest::new("coffee", "").validate(),
            Err(RequestError::MissingLocation)
        );
        assert!(AnalysisRequest::new("coffee", "Boston").validate().is_ok());
    }

    #[test]
    fn test_parse_price_tier_strict() {
        assert_eq!(parse_price_tier("premium").unwrap(), PriceTier::Premium);
        assert_eq!(
            parse_price_tier("gold").unwrap_err(),
            RequestError::UnknownPriceTier("gold".to_string())
        );
    }

    #[test]
    fn test_request_serde_defaults() {
        let request: AnalysisRequest =
            serde_json::from_str(r#"{"business": "gym", "location": "Chicago"}"#).unwrap();
        assert_eq!(request.radius, Radius::OneMile);
        assert_eq!(request.daypart, Daypart::Both);
        assert_eq!(request.price_tier, PriceTier::Mid);
    }
}
