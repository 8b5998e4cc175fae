use crate::animation::ease::Ease;
use crate::foundation::error::{ShowreelError, ShowreelResult};

/// Which scene variant a render is using. Also feeds the suggested output
/// filename.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SceneKind {
    /// Two-image directional wipe.
    Reveal,
    /// N-image crossfade slideshow.
    Showcase,
}

impl SceneKind {
    /// Lowercase name used in filenames and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Reveal => "reveal",
            Self::Showcase => "showcase",
        }
    }
}

/// Parameters for the two-image reveal wipe.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RevealSpec {
    /// Total wipe duration in milliseconds.
    #[serde(default = "default_reveal_duration_ms")]
    pub duration_ms: u64,
    /// Easing applied to the wipe progress.
    #[serde(default)]
    pub ease: Ease,
}

impl Default for RevealSpec {
    fn default() -> Self {
        Self {
            duration_ms: default_reveal_duration_ms(),
            ease: Ease::default(),
        }
    }
}

fn default_reveal_duration_ms() -> u64 {
    5000
}

/// Parameters for the N-image crossfade slideshow.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ShowcaseSpec {
    /// How long each frame holds at full opacity, in milliseconds.
    #[serde(default = "default_showcase_display_ms")]
    pub display_ms: u64,
    /// Crossfade length between consecutive frames, in milliseconds.
    #[serde(default = "default_showcase_transition_ms")]
    pub transition_ms: u64,
}

impl Default for ShowcaseSpec {
    fn default() -> Self {
        Self {
            display_ms: default_showcase_display_ms(),
            transition_ms: default_showcase_transition_ms(),
        }
    }
}

fn default_showcase_display_ms() -> u64 {
    1500
}

fn default_showcase_transition_ms() -> u64 {
    600
}

/// Scene selection plus its timing parameters.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum SceneSpec {
    /// Two-image directional wipe.
    Reveal(RevealSpec),
    /// N-image crossfade slideshow.
    Showcase(ShowcaseSpec),
}

impl SceneSpec {
    /// The variant tag of this spec.
    pub fn kind(&self) -> SceneKind {
        match self {
            Self::Reveal(_) => SceneKind::Reveal,
            Self::Showcase(_) => SceneKind::Showcase,
        }
    }

    /// Reject timing parameters the render loop cannot run with.
    pub fn validate(&self) -> ShowreelResult<()> {
        match self {
            Self::Reveal(spec) => {
                if spec.duration_ms == 0 {
                    return Err(ShowreelError::configuration(
                        "reveal duration_ms must be > 0",
                    ));
                }
            }
            Self::Showcase(spec) => {
                if spec.display_ms == 0 {
                    return Err(ShowreelError::configuration(
                        "showcase display_ms must be > 0",
                    ));
                }
                if spec.transition_ms == 0 {
                    return Err(ShowreelError::configuration(
                        "showcase transition_ms must be > 0",
                    ));
                }
            }
        }
        Ok(())
    }

    /// How many prepared frames this scene binds. `None` means one or more.
    pub fn required_sources(&self) -> Option<usize> {
        match self {
            Self::Reveal(_) => Some(2),
            Self::Showcase(_) => None,
        }
    }
}

/// Overlay text configuration. All strings render with the session's
/// configured font; an empty string renders nothing while keeping the
/// overlay slot present in every descriptor.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OverlaySpec {
    /// Top-left label over the pre-reveal frame.
    #[serde(default = "default_before_label")]
    pub before_label: String,
    /// Top-right label over the revealed frame.
    #[serde(default = "default_after_label")]
    pub after_label: String,
    /// Prefix for per-frame showcase labels, rendered as "{prefix} {n}".
    #[serde(default = "default_variant_prefix")]
    pub variant_prefix: String,
    /// Watermark text, bottom-right, translucent. Present in every frame.
    #[serde(default)]
    pub watermark: String,
}

impl Default for OverlaySpec {
    fn default() -> Self {
        Self {
            before_label: default_before_label(),
            after_label: default_after_label(),
            variant_prefix: default_variant_prefix(),
            watermark: String::new(),
        }
    }
}

fn default_before_label() -> String {
    "BEFORE".to_owned()
}

fn default_after_label() -> String {
    "AFTER".to_owned()
}

fn default_variant_prefix() -> String {
    "VARIATION".to_owned()
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
