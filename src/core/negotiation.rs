//! Content negotiation over the `Accept` header
//!
//! Negotiation is a two-stage parse:
//!
//! 1. [`MediaType::parse`] turns one media range into `type/subtype+suffix`
//!    plus parameters, or fails.
//! 2. [`Negotiator::classify`] inspects the subtype: a trailing hypermedia
//!    token (default `hateoas`) switches links on and is stripped; a trailing
//!    variant token (default `full`) on what remains selects the full
//!    projection.
//!
//! `application/vnd.example.author.full.hateoas+json` therefore negotiates to
//! `{ variant: Full, include_links: true }` and `application/json` to
//! `{ variant: Default, include_links: false }`.

use crate::config::NegotiationConfig;
use crate::core::error::NegotiationError;
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

/// Media type assumed when a request carries no `Accept` header
pub const DEFAULT_MEDIA_TYPE: &str = "application/json";

/// Reasons a media range fails to parse
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MediaTypeParseError {
    #[error("empty media type")]
    Empty,
    #[error("'{0}' is not of the form type/subtype")]
    InvalidEssence(String),
    #[error("invalid parameter '{0}'")]
    InvalidParameter(String),
}

/// A parsed media range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaType {
    /// Top-level type, lowercase (e.g., "application")
    pub type_: String,
    /// Subtype without structured-syntax suffix, lowercase (e.g., "vnd.example.author.full")
    pub subtype: String,
    /// Structured-syntax suffix, lowercase (e.g., "json")
    pub suffix: Option<String>,
    /// Parameters in header order
    pub parameters: Vec<(String, String)>,
}

fn essence_regex() -> &'static Regex {
    static ESSENCE_REGEX: OnceLock<Regex> = OnceLock::new();
    ESSENCE_REGEX.get_or_init(|| {
        Regex::new(r"^([!#$%&'*+.^_`|~0-9A-Za-z-]+)/([!#$%&'*+.^_`|~0-9A-Za-z-]+)$")
            .expect("media type pattern is valid")
    })
}

fn parameter_regex() -> &'static Regex {
    static PARAMETER_REGEX: OnceLock<Regex> = OnceLock::new();
    PARAMETER_REGEX.get_or_init(|| {
        Regex::new(r#"^([!#$%&'*+.^_`|~0-9A-Za-z-]+)=("(?:[^"\\]|\\.)*"|[!#$%&'*+.^_`|~0-9A-Za-z-]+)$"#)
            .expect("media type parameter pattern is valid")
    })
}

impl MediaType {
    /// Parse a single media range such as `application/vnd.a.b+json; q=0.9`
    pub fn parse(value: &str) -> Result<Self, MediaTypeParseError> {
        let mut parts = value.split(';');
        let essence = parts.next().unwrap_or_default().trim();
        if essence.is_empty() {
            return Err(MediaTypeParseError::Empty);
        }

        let captures = essence_regex()
            .captures(essence)
            .ok_or_else(|| MediaTypeParseError::InvalidEssence(essence.to_string()))?;
        let type_ = captures[1].to_lowercase();
        let full_subtype = captures[2].to_lowercase();

        let (subtype, suffix) = match full_subtype.rsplit_once('+') {
            Some((subtype, suffix)) if !subtype.is_empty() && !suffix.is_empty() => {
                (subtype.to_string(), Some(suffix.to_string()))
            }
            Some(_) => return Err(MediaTypeParseError::InvalidEssence(essence.to_string())),
            None => (full_subtype, None),
        };

        let mut parameters = Vec::new();
        for raw in parts {
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }
            let captures = parameter_regex()
                .captures(raw)
                .ok_or_else(|| MediaTypeParseError::InvalidParameter(raw.to_string()))?;
            let value = captures[2].trim_matches('"').to_string();
            parameters.push((captures[1].to_lowercase(), value));
        }

        Ok(Self {
            type_,
            subtype,
            suffix,
            parameters,
        })
    }

    /// `type/subtype+suffix`, without parameters
    pub fn essence(&self) -> String {
        match &self.suffix {
            Some(suffix) => format!("{}/{}+{}", self.type_, self.subtype, suffix),
            None => format!("{}/{}", self.type_, self.subtype),
        }
    }
}

/// Which projection a response is mapped into before shaping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RepresentationVariant {
    /// The friendly projection (e.g., author name and age)
    Default,
    /// The full projection (e.g., first name, last name, date of birth)
    Full,
}

/// Outcome of negotiating one `Accept` value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NegotiatedMediaType {
    /// The requested media type, without parameters
    pub media_type: String,
    /// The requested media type with the hypermedia token removed
    pub base_type: String,
    /// Whether hypermedia links are embedded
    pub include_links: bool,
    /// Which projection to use
    pub variant: RepresentationVariant,
}

/// Classifies `Accept` values using the configured tokens
#[derive(Debug, Clone)]
pub struct Negotiator {
    hypermedia_suffix: String,
    full_variant_token: String,
}

impl Default for Negotiator {
    fn default() -> Self {
        Self::new(&NegotiationConfig::default())
    }
}

impl Negotiator {
    pub fn new(config: &NegotiationConfig) -> Self {
        Self {
            hypermedia_suffix: config.hypermedia_suffix.to_lowercase(),
            full_variant_token: config.full_variant_token.to_lowercase(),
        }
    }

    /// Negotiate an `Accept` header value
    ///
    /// When the header lists several media ranges, the first one is
    /// negotiated; every range must still parse.
    pub fn negotiate(&self, accept: &str) -> Result<NegotiatedMediaType, NegotiationError> {
        let mut first = None;
        for range in accept.split(',') {
            let media_type =
                MediaType::parse(range).map_err(|e| NegotiationError::UnsupportedMediaType {
                    value: accept.to_string(),
                    reason: e.to_string(),
                })?;
            first.get_or_insert(media_type);
        }

        let media_type = first.ok_or_else(|| NegotiationError::UnsupportedMediaType {
            value: accept.to_string(),
            reason: MediaTypeParseError::Empty.to_string(),
        })?;

        let negotiated = self.classify(&media_type);
        tracing::debug!(
            accept,
            include_links = negotiated.include_links,
            variant = ?negotiated.variant,
            "Negotiated representation"
        );
        Ok(negotiated)
    }

    /// Negotiate an optional header, defaulting to [`DEFAULT_MEDIA_TYPE`]
    pub fn negotiate_optional(
        &self,
        accept: Option<&str>,
    ) -> Result<NegotiatedMediaType, NegotiationError> {
        self.negotiate(accept.unwrap_or(DEFAULT_MEDIA_TYPE))
    }

    /// Classify an already-parsed media type
    pub fn classify(&self, media_type: &MediaType) -> NegotiatedMediaType {
        let (base_subtype, include_links) =
            match strip_token(&media_type.subtype, &self.hypermedia_suffix) {
                Some(stripped) => (stripped, true),
                None => (media_type.subtype.as_str(), false),
            };

        let variant = match base_subtype.rsplit('.').next() {
            Some(last) if last == self.full_variant_token => RepresentationVariant::Full,
            _ => RepresentationVariant::Default,
        };

        let base = MediaType {
            type_: media_type.type_.clone(),
            subtype: base_subtype.to_string(),
            suffix: media_type.suffix.clone(),
            parameters: Vec::new(),
        };

        NegotiatedMediaType {
            media_type: media_type.essence(),
            base_type: base.essence(),
            include_links,
            variant,
        }
    }
}

/// Strip a trailing token (and one `.` before it) from a lowercase subtype
fn strip_token<'a>(subtype: &'a str, token: &str) -> Option<&'a str> {
    if token.is_empty() {
        return None;
    }
    let stripped = subtype.strip_suffix(token)?;
    Some(stripped.strip_suffix('.').unwrap_or(stripped))
}

/// Negotiate with the default tokens (`hateoas`, `full`)
pub fn negotiate(accept: &str) -> Result<NegotiatedMediaType, NegotiationError> {
    Negotiator::default().negotiate(accept)
}
