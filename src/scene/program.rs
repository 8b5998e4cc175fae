use crate::animation::ease::Ease;
use crate::assets::frame::PreparedFrame;
use crate::foundation::core::Canvas;
use crate::foundation::error::{ShowreelError, ShowreelResult};
use crate::scene::model::{OverlaySpec, SceneKind, SceneSpec};

/// What to composite for one tick.
#[derive(Clone, Debug)]
pub enum FrameContent {
    /// One frame at full opacity.
    Single {
        /// The frame to draw.
        frame: PreparedFrame,
    },
    /// Linear crossfade, drawn under-then-over.
    Crossfade {
        /// Drawn first at full opacity.
        under: PreparedFrame,
        /// Blended over `under`.
        over: PreparedFrame,
        /// Opacity of `over`, in `[0, 1]`.
        alpha: f64,
    },
    /// Hard-edged directional wipe.
    ///
    /// Convention, held invariant: `before` is visible in columns
    /// `[0, boundary_px)` and `after` everywhere else, so the boundary
    /// recedes from the right edge (full width) to the left edge (zero) as
    /// the reveal progresses.
    Wipe {
        /// Visible left of the boundary.
        before: PreparedFrame,
        /// Uncovered from the right.
        after: PreparedFrame,
        /// First column owned by `after`.
        boundary_px: u32,
    },
}

/// Where an overlay string is anchored on the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverlayAnchor {
    /// Margin-inset from the top-left corner.
    TopLeft,
    /// Margin-inset from the top-right corner.
    TopRight,
    /// Margin-inset from the bottom-right corner.
    BottomRight,
}

/// How an overlay is styled when rasterized.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverlayRole {
    /// Scene label (frame names, variant numbering).
    Label,
    /// Persistent translucent watermark.
    Watermark,
}

/// One overlay string with placement and styling role. Empty text keeps the
/// slot present but renders nothing.
#[derive(Clone, Debug)]
pub struct Overlay {
    /// Text to rasterize.
    pub text: String,
    /// Placement.
    pub anchor: OverlayAnchor,
    /// Styling role.
    pub role: OverlayRole,
}

/// Everything the surface needs to composite one tick. Ephemeral:
/// recomputed from elapsed time on every tick, never stored.
#[derive(Clone, Debug)]
pub struct FrameDescriptor {
    /// Frame content and blend parameters.
    pub content: FrameContent,
    /// Overlay strings, drawn after the content in order.
    pub overlays: Vec<Overlay>,
}

#[derive(Debug)]
enum ScenePlan {
    Reveal {
        before: PreparedFrame,
        after: PreparedFrame,
        duration_ms: u64,
        ease: Ease,
    },
    Showcase {
        frames: Vec<PreparedFrame>,
        display_ms: u64,
        transition_ms: u64,
    },
}

/// A validated scene bound to its prepared frames: a pure function from
/// elapsed milliseconds to a [`FrameDescriptor`].
///
/// Calling [`SceneProgram::descriptor_at`] twice with the same input always
/// yields the same output; there is no hidden state, which is what makes
/// output length deterministic independent of the tick-driving rate. The
/// total duration is finite and known up front via
/// [`SceneProgram::duration_ms`].
#[derive(Debug)]
pub struct SceneProgram {
    canvas: Canvas,
    overlays: OverlaySpec,
    plan: ScenePlan,
}

impl SceneProgram {
    /// Bind a validated spec to its prepared frames.
    ///
    /// Rejects with [`ShowreelError::Configuration`]: invalid timings, a
    /// frame count that does not match the variant (`Reveal` takes exactly
    /// two, `Showcase` at least one), or any frame whose dimensions differ
    /// from the canvas.
    pub fn new(
        spec: &SceneSpec,
        frames: Vec<PreparedFrame>,
        canvas: Canvas,
        overlays: OverlaySpec,
    ) -> ShowreelResult<Self> {
        spec.validate()?;

        for (i, frame) in frames.iter().enumerate() {
            if frame.width() != canvas.width || frame.height() != canvas.height {
                return Err(ShowreelError::configuration(format!(
                    "prepared frame {i} is {}x{}, canvas is {}x{}",
                    frame.width(),
                    frame.height(),
                    canvas.width,
                    canvas.height
                )));
            }
        }

        let plan = match spec {
            SceneSpec::Reveal(reveal) => {
                let mut it = frames.into_iter();
                let (Some(before), Some(after), None) = (it.next(), it.next(), it.next()) else {
                    return Err(ShowreelError::configuration(
                        "reveal requires exactly two prepared frames (before, after)",
                    ));
                };
                ScenePlan::Reveal {
                    before,
                    after,
                    duration_ms: reveal.duration_ms,
                    ease: reveal.ease,
                }
            }
            SceneSpec::Showcase(showcase) => {
                if frames.is_empty() {
                    return Err(ShowreelError::configuration(
                        "showcase requires at least one prepared frame",
                    ));
                }
                ScenePlan::Showcase {
                    frames,
                    display_ms: showcase.display_ms,
                    transition_ms: showcase.transition_ms,
                }
            }
        };

        Ok(Self {
            canvas,
            overlays,
            plan,
        })
    }

    /// The variant this program runs.
    pub fn kind(&self) -> SceneKind {
        match self.plan {
            ScenePlan::Reveal { .. } => SceneKind::Reveal,
            ScenePlan::Showcase { .. } => SceneKind::Showcase,
        }
    }

    /// Canvas every descriptor targets.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Total scene duration in milliseconds: `duration_ms` for a reveal,
    /// `frame_count * (display_ms + transition_ms)` for a showcase.
    pub fn duration_ms(&self) -> u64 {
        match &self.plan {
            ScenePlan::Reveal { duration_ms, .. } => *duration_ms,
            ScenePlan::Showcase {
                frames,
                display_ms,
                transition_ms,
            } => frames.len() as u64 * (display_ms + transition_ms),
        }
    }

    /// Whether the scene has reached its terminal state at `elapsed_ms`.
    pub fn is_finished(&self, elapsed_ms: u64) -> bool {
        elapsed_ms >= self.duration_ms()
    }

    /// Describe the frame for `elapsed_ms`. Total over all inputs: past the
    /// scene duration this returns the terminal state (fully revealed for
    /// `Reveal`, the loop-closing first frame for `Showcase`).
    pub fn descriptor_at(&self, elapsed_ms: u64) -> FrameDescriptor {
        match &self.plan {
            ScenePlan::Reveal {
                before,
                after,
                duration_ms,
                ease,
            } => {
                let progress = (elapsed_ms as f64 / *duration_ms as f64).min(1.0);
                let eased = ease.apply(progress);
                let boundary_px =
                    (f64::from(self.canvas.width) * (1.0 - eased)).round() as u32;
                FrameDescriptor {
                    content: FrameContent::Wipe {
                        before: before.clone(),
                        after: after.clone(),
                        boundary_px: boundary_px.min(self.canvas.width),
                    },
                    overlays: vec![
                        Overlay {
                            text: self.overlays.before_label.clone(),
                            anchor: OverlayAnchor::TopLeft,
                            role: OverlayRole::Label,
                        },
                        Overlay {
                            text: self.overlays.after_label.clone(),
                            anchor: OverlayAnchor::TopRight,
                            role: OverlayRole::Label,
                        },
                        self.watermark(),
                    ],
                }
            }
            ScenePlan::Showcase {
                frames,
                display_ms,
                transition_ms,
            } => {
                let n = frames.len() as u64;
                let cycle_ms = display_ms + transition_ms;
                let cycle_index = elapsed_ms / cycle_ms;

                if cycle_index >= n {
                    // Terminal: the last transition has closed the loop back
                    // onto the first frame.
                    return FrameDescriptor {
                        content: FrameContent::Single {
                            frame: frames[0].clone(),
                        },
                        overlays: vec![self.showcase_label(0), self.watermark()],
                    };
                }

                let idx = (cycle_index % n) as usize;
                let in_cycle = elapsed_ms % cycle_ms;
                let content = if in_cycle < *display_ms {
                    FrameContent::Single {
                        frame: frames[idx].clone(),
                    }
                } else {
                    let next = (idx + 1) % frames.len();
                    FrameContent::Crossfade {
                        under: frames[idx].clone(),
                        over: frames[next].clone(),
                        alpha: (in_cycle - display_ms) as f64 / *transition_ms as f64,
                    }
                };
                FrameDescriptor {
                    content,
                    overlays: vec![self.showcase_label(idx), self.watermark()],
                }
            }
        }
    }

    // The label sticks to the cycle's own frame for the whole cycle,
    // including its transition tail.
    fn showcase_label(&self, idx: usize) -> Overlay {
        Overlay {
            text: format!("{} {}", self.overlays.variant_prefix, idx + 1),
            anchor: OverlayAnchor::TopLeft,
            role: OverlayRole::Label,
        }
    }

    fn watermark(&self) -> Overlay {
        Overlay {
            text: self.overlays.watermark.clone(),
            anchor: OverlayAnchor::BottomRight,
            role: OverlayRole::Watermark,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/program.rs"]
mod tests;
