use thiserror::Error;

/// Problems with what the caller asked for, as opposed to how it was computed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("a business type is required (e.g. --business \"coffee shop\")")]
    MissingBusiness,

    #[error("a location is required (e.g. --location \"Providence, RI\")")]
    MissingLocation,

    #[error("unknown radius '{0}'. Use one of: 0.5 mile, 1 mile, 3 miles")]
    UnknownRadius(String),

    #[error("unknown daypart '{0}'. Use one of: day, evening, both")]
    UnknownDaypart(String),

    #[error("unknown price tier '{0}'. Use one of: budget, mid, premium")]
    UnknownPriceTier(String),

    #[error("rank {rank} is out of range. Must be between 1 and {count}")]
    RankOutOfRange { rank: usize, count: usize },
}

/// Failures while talking to an upstream data source.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("the places provider needs an API key: set {env} or provider.api_key in the config")]
    MissingApiKey { env: String },

    #[error("{api} API returned status {status}")]
    Api { api: &'static str, status: String },

    #[error("could not geocode '{0}'")]
    NotGeocoded(String),

    #[error("HTTP request to {api} failed")]
    Http {
        api: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid provider base URL '{0}'")]
    BaseUrl(String),
}
