//! Step events emitted while a maze is being generated.
//!
//! Events are deltas: a renderer can replay them to animate generation
//! without copying the grid at every step.

use std::fmt;

use serde::Serialize;

use crate::error::ConfigError;
use crate::grid::Coord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// Decorative pattern cells were marked closed.
    PatternMarked,
    /// A wall was opened between `a` and the newly visited `b`.
    Carve,
    /// `a` was popped off the carving stack.
    Backtrack,
    /// An extra passage between `a` and `b` was opened.
    LoopOpen,
    /// Generation finished; `a` is the entry, `b` the exit.
    Done,
}

impl StepKind {
    /// Kinds dispatched regardless of the stride.
    pub fn always_dispatched(self) -> bool {
        matches!(self, StepKind::PatternMarked | StepKind::Done)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StepKind::PatternMarked => "pattern_marked",
            StepKind::Carve => "carve",
            StepKind::Backtrack => "backtrack",
            StepKind::LoopOpen => "loop_open",
            StepKind::Done => "done",
        }
    }
}

/// A single generation event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MazeStep {
    pub kind: StepKind,
    pub a: Option<Coord>,
    pub b: Option<Coord>,
    /// Walkable cells visited so far (best effort for loop events).
    pub visited: usize,
}

impl MazeStep {
    pub fn new(kind: StepKind, a: Option<Coord>, b: Option<Coord>, visited: usize) -> Self {
        Self { kind, a, b, visited }
    }
}

impl fmt::Display for MazeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind.as_str())?;
        match (self.a, self.b) {
            (Some(a), Some(b)) => write!(f, " {}->{}", a, b)?,
            (Some(a), None) => write!(f, " {}", a)?,
            (None, Some(b)) => write!(f, " ->{}", b)?,
            (None, None) => {}
        }
        write!(f, " visited={}", self.visited)
    }
}

/// Observer callback; invoked inline, in generation order.
pub type StepObserver<'a> = &'a mut dyn FnMut(&MazeStep);

/// Applies the stride policy in front of an optional observer.
pub(crate) struct StepSink<'a> {
    observer: Option<StepObserver<'a>>,
    every: usize,
    counter: usize,
}

impl<'a> StepSink<'a> {
    pub(crate) fn new(observer: Option<StepObserver<'a>>, every: usize) -> Result<Self, ConfigError> {
        if every == 0 {
            return Err(ConfigError::InvalidStride(every));
        }
        Ok(Self {
            observer,
            every,
            counter: 0,
        })
    }

    pub(crate) fn emit(&mut self, step: MazeStep) {
        if !step.kind.always_dispatched() {
            self.counter += 1;
            if self.counter % self.every != 0 {
                return;
            }
        }
        if let Some(observer) = self.observer.as_deref_mut() {
            observer(&step);
        }
    }
}
