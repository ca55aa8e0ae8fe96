use std::fmt;

/// SOME/IP-SD startup phases, in the order an entity walks through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhaseLabel {
    Boot,
    Initial,
    Repetition,
    Main,
}

impl PhaseLabel {
    pub const ALL: [PhaseLabel; 4] = [
        PhaseLabel::Boot,
        PhaseLabel::Initial,
        PhaseLabel::Repetition,
        PhaseLabel::Main,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PhaseLabel::Boot => "Boot",
            PhaseLabel::Initial => "Initial",
            PhaseLabel::Repetition => "Repetition",
            PhaseLabel::Main => "Main",
        }
    }
}

impl fmt::Display for PhaseLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Phase {
    pub start: f64,
    pub end: f64,
    pub duration: f64,
    pub label: PhaseLabel,
}

impl Phase {
    pub fn new(start: f64, duration: f64, label: PhaseLabel) -> Self {
        Phase {
            start,
            end: start + duration,
            duration,
            label,
        }
    }

    /// Moves the right edge out to `end`. Never shrinks the phase.
    pub(crate) fn widen_to(&mut self, end: f64) {
        if end > self.end {
            self.end = end;
            self.duration = end - self.start;
        }
    }

    pub fn contains(&self, t: f64) -> bool {
        t >= self.start && t < self.end
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{:.2},{:.2},{}>", self.start, self.end, self.label)
    }
}
