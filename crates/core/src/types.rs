//! Value types exchanged between the orchestrator and its collaborators.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SubmissionError;
use crate::prompt;

// ---------------------------------------------------------------------------
// Media configuration
// ---------------------------------------------------------------------------

/// Output resolution of the generated video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resolution {
    #[serde(rename = "720p")]
    Hd720,
    #[serde(rename = "1080p")]
    FullHd1080,
}

impl Resolution {
    /// Wire name as understood by the remote service.
    pub fn as_str(&self) -> &'static str {
        match self {
            Resolution::Hd720 => "720p",
            Resolution::FullHd1080 => "1080p",
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resolution {
    type Err = SubmissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "720p" => Ok(Resolution::Hd720),
            "1080p" => Ok(Resolution::FullHd1080),
            other => Err(SubmissionError::Invalid(format!(
                "Unknown resolution: '{other}'. Valid resolutions: 720p, 1080p"
            ))),
        }
    }
}

/// Frame aspect ratio of the generated video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AspectRatio {
    #[serde(rename = "16:9")]
    Landscape,
    #[serde(rename = "9:16")]
    Portrait,
}

impl AspectRatio {
    /// Wire name as understood by the remote service.
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Landscape => "16:9",
            AspectRatio::Portrait => "9:16",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AspectRatio {
    type Err = SubmissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "16:9" => Ok(AspectRatio::Landscape),
            "9:16" => Ok(AspectRatio::Portrait),
            other => Err(SubmissionError::Invalid(format!(
                "Unknown aspect ratio: '{other}'. Valid aspect ratios: 16:9, 9:16"
            ))),
        }
    }
}

/// Resolution / aspect-ratio pairs the remote service accepts.
///
/// 1080p output is only rendered in landscape.
pub const SUPPORTED_COMBINATIONS: &[(Resolution, AspectRatio)] = &[
    (Resolution::Hd720, AspectRatio::Landscape),
    (Resolution::Hd720, AspectRatio::Portrait),
    (Resolution::FullHd1080, AspectRatio::Landscape),
];

/// Media settings for one generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaConfig {
    pub resolution: Resolution,
    pub aspect_ratio: AspectRatio,
    /// Number of artifacts requested from the service. Must be at least 1.
    pub count: u32,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            resolution: Resolution::Hd720,
            aspect_ratio: AspectRatio::Portrait,
            count: 1,
        }
    }
}

// ---------------------------------------------------------------------------
// GenerationRequest
// ---------------------------------------------------------------------------

/// An immutable description of the video to generate.
///
/// Construction never fails; [`validate`](Self::validate) is run by the
/// submission client before anything is sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    subject: String,
    media: MediaConfig,
}

impl GenerationRequest {
    pub fn new(subject: impl Into<String>, media: MediaConfig) -> Self {
        Self {
            subject: subject.into(),
            media,
        }
    }

    /// The product or scene the video is about.
    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn media(&self) -> &MediaConfig {
        &self.media
    }

    /// Full descriptive prompt sent to the remote service.
    pub fn prompt(&self) -> String {
        prompt::build_prompt(&self.subject)
    }

    /// Reject malformed requests before they reach the network.
    pub fn validate(&self) -> Result<(), SubmissionError> {
        if self.subject.trim().is_empty() {
            return Err(SubmissionError::Invalid(
                "Subject description must not be empty".to_string(),
            ));
        }
        if self.media.count < 1 {
            return Err(SubmissionError::Invalid(format!(
                "Requested artifact count must be at least 1, got {}",
                self.media.count
            )));
        }
        let pair = (self.media.resolution, self.media.aspect_ratio);
        if !SUPPORTED_COMBINATIONS.contains(&pair) {
            return Err(SubmissionError::Invalid(format!(
                "Unsupported combination: {} at {}",
                self.media.resolution, self.media.aspect_ratio
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Job handle and status
// ---------------------------------------------------------------------------

/// Opaque identifier the remote service returned for a submitted job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobHandle(String);

impl JobHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Authorized URI of one generated artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactLocator(String);

impl ArtifactLocator {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtifactLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Output of a finished job.
///
/// An empty locator list is a distinct failure ("succeeded with no
/// output"), never a pending job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultDescriptor {
    pub locators: Vec<ArtifactLocator>,
}

impl ResultDescriptor {
    pub fn new(locators: Vec<ArtifactLocator>) -> Self {
        Self { locators }
    }

    pub fn is_empty(&self) -> bool {
        self.locators.is_empty()
    }

    pub fn first(&self) -> Option<&ArtifactLocator> {
        self.locators.first()
    }
}

/// Result of a single status query.
#[derive(Debug, Clone, PartialEq)]
pub enum JobStatus {
    Pending,
    Done(ResultDescriptor),
    Failed(crate::error::RemoteError),
}

// ---------------------------------------------------------------------------
// LocalArtifact
// ---------------------------------------------------------------------------

/// A retrieved artifact held in memory, ready for playback or saving.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocalArtifact {
    /// Locator the bytes were fetched from.
    pub locator: ArtifactLocator,
    /// `Content-Type` reported by the server, if any.
    pub content_type: Option<String>,
    #[serde(skip)]
    pub data: Arc<[u8]>,
    pub retrieved_at: DateTime<Utc>,
}

impl LocalArtifact {
    pub fn new(locator: ArtifactLocator, content_type: Option<String>, data: Vec<u8>) -> Self {
        Self {
            locator,
            content_type,
            data: data.into(),
            retrieved_at: Utc::now(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }
}
