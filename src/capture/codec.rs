use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{ShowreelError, ShowreelResult};
use crate::scene::model::SceneKind;

/// Container a finished artifact is laid out in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerFormat {
    /// WebM, the home of VP8/VP9 streams.
    Webm,
    /// Fragmented MP4, streamable without a seekable output.
    Mp4,
    /// Matroska, for codecs neither of the above accepts.
    Mkv,
}

impl ContainerFormat {
    /// File extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            ContainerFormat::Webm => "webm",
            ContainerFormat::Mp4 => "mp4",
            ContainerFormat::Mkv => "mkv",
        }
    }
}

/// Container used when no preference-list candidate is supported.
pub(crate) const DEFAULT_CONTAINER: ContainerFormat = ContainerFormat::Webm;

/// One entry in a codec preference list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecCandidate {
    /// Encoder identifier handed to the probe, e.g. `"vp9"`.
    pub id: String,
    /// Container the artifact is tagged with when this entry wins.
    pub container: ContainerFormat,
}

impl CodecCandidate {
    /// Build a candidate.
    pub fn new(id: impl Into<String>, container: ContainerFormat) -> Self {
        Self {
            id: id.into(),
            container,
        }
    }
}

/// Capability probe consulted during negotiation.
///
/// Injecting the probe keeps negotiation deterministic in tests and lets
/// hosts bridge whatever capability query their platform offers.
pub trait CodecProbe {
    /// Whether `codec_id` can be encoded.
    fn supports(&self, codec_id: &str) -> bool;
}

/// Probe with a fixed supported set.
#[derive(Clone, Debug, Default)]
pub struct StaticProbe {
    supported: BTreeSet<String>,
}

impl StaticProbe {
    /// Probe reporting exactly `ids` as supported.
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            supported: ids.into_iter().map(Into::into).collect(),
        }
    }
}

impl CodecProbe for StaticProbe {
    fn supports(&self, codec_id: &str) -> bool {
        self.supported.contains(codec_id)
    }
}

/// Outcome of negotiation. `id` is `None` when every candidate was
/// unsupported and the encoder default is used instead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NegotiatedCodec {
    /// Winning encoder identifier, if any candidate was supported.
    pub id: Option<String>,
    /// Container for the artifact.
    pub container: ContainerFormat,
}

/// Pick the first candidate the probe supports, in preference order.
///
/// An empty or fully unsupported list falls back to the encoder default
/// (id `None`, WebM container) with a warning rather than failing, so a
/// render always has a codec to run with.
pub fn negotiate(candidates: &[CodecCandidate], probe: &dyn CodecProbe) -> NegotiatedCodec {
    for candidate in candidates {
        if probe.supports(&candidate.id) {
            return NegotiatedCodec {
                id: Some(candidate.id.clone()),
                container: candidate.container,
            };
        }
    }
    tracing::warn!(
        candidates = candidates.len(),
        "no preferred codec supported, falling back to the encoder default"
    );
    NegotiatedCodec {
        id: None,
        container: DEFAULT_CONTAINER,
    }
}

/// Like [`negotiate`], but a fully unsupported list is an
/// [`ShowreelError::UnsupportedFormat`] error instead of a fallback.
pub fn negotiate_strict(
    candidates: &[CodecCandidate],
    probe: &dyn CodecProbe,
) -> ShowreelResult<NegotiatedCodec> {
    for candidate in candidates {
        if probe.supports(&candidate.id) {
            return Ok(NegotiatedCodec {
                id: Some(candidate.id.clone()),
                container: candidate.container,
            });
        }
    }
    let tried = candidates
        .iter()
        .map(|c| c.id.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    Err(ShowreelError::unsupported_format(format!(
        "no supported codec among [{tried}]"
    )))
}

/// Default preference order: VP9, then VP8, then container-generic entries
/// that let the encoder pick.
pub fn default_codec_preferences() -> Vec<CodecCandidate> {
    vec![
        CodecCandidate::new("vp9", ContainerFormat::Webm),
        CodecCandidate::new("vp8", ContainerFormat::Webm),
        CodecCandidate::new("webm", ContainerFormat::Webm),
        CodecCandidate::new("mp4", ContainerFormat::Mp4),
    ]
}

/// Download-style filename: `{prefix}-{scene}-{timestamp_ms}.{ext}`.
pub fn suggested_file_name(
    prefix: &str,
    scene: SceneKind,
    container: ContainerFormat,
    timestamp_ms: u64,
) -> String {
    format!(
        "{prefix}-{}-{timestamp_ms}.{}",
        scene.as_str(),
        container.extension()
    )
}

#[cfg(test)]
#[path = "../../tests/unit/capture/codec.rs"]
mod tests;
