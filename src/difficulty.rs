/// Difficulty presets. Each one fixes how big a target gets and how fast it
/// grows (and later shrinks) per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Largest radius a target reaches before it starts shrinking, in pixels.
    pub fn max_radius(&self) -> f32 {
        match self {
            Difficulty::Easy => 40.0,
            Difficulty::Medium => 30.0,
            Difficulty::Hard => 25.0,
        }
    }

    /// Radius change per tick, in pixels.
    pub fn growth_rate(&self) -> f32 {
        match self {
            Difficulty::Easy => 0.2,
            Difficulty::Medium => 0.3,
            Difficulty::Hard => 0.4,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn harder_difficulties_have_smaller_faster_targets() {
        let order = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];
        for pair in order.windows(2) {
            assert!(pair[0].max_radius() > pair[1].max_radius());
            assert!(pair[0].growth_rate() < pair[1].growth_rate());
        }
    }
}
