/// How strictly castling eligibility is checked.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum CastlingRule {
    /// Standard chess: the king may not castle out of check or across an
    /// observed square.
    #[default]
    Standard,
    /// Only the unmoved and unobstructed conditions are checked.
    Permissive,
}

/// Rule switches for a single game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RulesConfig {
    pub castling: CastlingRule,
    /// Declare a draw when neither side can possibly mate
    pub insufficient_material_draw: bool,
    /// Print a line for every move and undo
    pub verbose: bool,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            castling: CastlingRule::Standard,
            insufficient_material_draw: false,
            verbose: false,
        }
    }
}

impl RulesConfig {
    pub fn permissive() -> Self {
        Self {
            castling: CastlingRule::Permissive,
            ..Self::default()
        }
    }
}
