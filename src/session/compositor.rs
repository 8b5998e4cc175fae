use crate::foundation::error::ShowreelResult;
use crate::render::surface::Surface;
use crate::scene::program::SceneProgram;

/// Whether a tick left the scene running or found it finished.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// The scene still has time to run.
    Continue,
    /// The scene reached its duration; its terminal frame has been drawn.
    Complete,
}

/// Cooperative driver turning elapsed time into drawn frames.
///
/// Each tick draws the descriptor for `elapsed_ms` onto the surface. The
/// first tick at or past the scene duration draws the terminal frame and
/// reports [`TickOutcome::Complete`]; every later tick is a draw-free no-op,
/// so a host that keeps ticking cannot redraw or re-complete a finished
/// scene.
#[derive(Debug)]
pub struct CompositorLoop {
    program: SceneProgram,
    completed: bool,
}

impl CompositorLoop {
    /// Wrap a program, ready to tick from elapsed 0.
    pub fn new(program: SceneProgram) -> Self {
        Self {
            program,
            completed: false,
        }
    }

    /// The wrapped program.
    pub fn program(&self) -> &SceneProgram {
        &self.program
    }

    /// Whether a previous tick reported Complete.
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Draw the frame for `elapsed_ms` and report whether the scene is done.
    pub fn tick(&mut self, elapsed_ms: u64, surface: &mut Surface) -> ShowreelResult<TickOutcome> {
        if self.completed {
            return Ok(TickOutcome::Complete);
        }
        let descriptor = self.program.descriptor_at(elapsed_ms);
        surface.draw(&descriptor)?;
        if self.program.is_finished(elapsed_ms) {
            self.completed = true;
            return Ok(TickOutcome::Complete);
        }
        Ok(TickOutcome::Continue)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/compositor.rs"]
mod tests;
