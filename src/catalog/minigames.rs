//! Minigame catalog and result validation

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::engine::progression::Grant;
use crate::error::{GameError, GameResult};

pub const SCORE_MAX: u32 = 5;
/// Scores at or above this count as a win
pub const SUCCESS_SCORE: u32 = 3;
pub const ELAPSED_MIN_MS: u64 = 500;
pub const ELAPSED_MAX_MS: u64 = 120_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MinigameCategory {
    Math,
    Letters,
    Logic,
    Reflex,
    /// Anything played inside the 3D scene
    Scene3d,
}

impl MinigameCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Math => "math",
            Self::Letters => "letters",
            Self::Logic => "logic",
            Self::Reflex => "reflex",
            Self::Scene3d => "3d",
        }
    }
}

/// Where the game was played
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayMode {
    /// Classic 2D board; wins and losses both restore a little energy
    #[default]
    Classic,
    Scene3d,
}

impl FromStr for PlayMode {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "classic" | "math" => Ok(Self::Classic),
            "3d" | "scene3d" => Ok(Self::Scene3d),
            _ => Err(GameError::InvalidInput(format!(
                "unknown play mode: {s} (expected classic or scene3d)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameType {
    pub key: &'static str,
    pub title: &'static str,
    pub category: MinigameCategory,
}

const fn game(key: &'static str, title: &'static str, category: MinigameCategory) -> GameType {
    GameType {
        key,
        title,
        category,
    }
}

pub static GAME_TYPES: &[GameType] = &[
    game("count_2_4", "Count 2 to 4", MinigameCategory::Math),
    game("sum_4_6", "Sums up to 6", MinigameCategory::Math),
    game("compare", "Bigger or smaller", MinigameCategory::Math),
    game("fast_count_6_8", "Quick count 6 to 8", MinigameCategory::Math),
    game("sub_1_5", "Take away up to 5", MinigameCategory::Math),
    game("sequence_next", "What comes next", MinigameCategory::Math),
    game("shape_count", "Count the shapes", MinigameCategory::Math),
    game("word_problem_lite", "Little word problems", MinigameCategory::Math),
    game("ru_letter_sound_pick", "Pick the letter sound", MinigameCategory::Letters),
    game("ru_first_letter_word", "First letter of the word", MinigameCategory::Letters),
    game("ru_vowel_consonant", "Vowel or consonant", MinigameCategory::Letters),
    game("ru_missing_letter", "Missing letter", MinigameCategory::Letters),
    game("memory_pairs", "Memory pairs", MinigameCategory::Logic),
    game("pixel_pattern", "Pixel pattern", MinigameCategory::Logic),
    game("hangman", "Hangman", MinigameCategory::Logic),
    game("tic_tac_toe", "Tic-tac-toe", MinigameCategory::Logic),
    game("food_catcher", "Food catcher", MinigameCategory::Reflex),
];

pub fn find_game(key: &str) -> Option<&'static GameType> {
    GAME_TYPES.iter().find(|g| g.key == key)
}

/// A finished round as reported by the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinigameResult {
    pub game_type: String,
    pub score: u32,
    pub elapsed_ms: u64,
    #[serde(default)]
    pub mode: PlayMode,
}

/// A result that passed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredPlay {
    pub game: &'static GameType,
    pub category: MinigameCategory,
    pub mode: PlayMode,
    pub score: u32,
    pub elapsed_ms: u64,
    pub success: bool,
}

impl ScoredPlay {
    pub fn reward(&self) -> Grant {
        if self.success {
            Grant::new(15, 10).with_intelligence(2)
        } else {
            Grant::new(6, 3)
        }
    }

    /// Energy and happiness restored by a classic round
    pub fn recovery(&self) -> Option<(i32, i32)> {
        match (self.mode, self.success) {
            (PlayMode::Classic, true) => Some((12, 4)),
            (PlayMode::Classic, false) => Some((6, 2)),
            (PlayMode::Scene3d, _) => None,
        }
    }
}

pub fn score_play(result: &MinigameResult) -> GameResult<ScoredPlay> {
    let game = find_game(&result.game_type)
        .ok_or_else(|| GameError::InvalidInput(format!("unknown game type: {}", result.game_type)))?;
    if result.score > SCORE_MAX {
        return Err(GameError::InvalidInput(format!(
            "score {} is outside 0..={SCORE_MAX}",
            result.score
        )));
    }
    if !(ELAPSED_MIN_MS..=ELAPSED_MAX_MS).contains(&result.elapsed_ms) {
        return Err(GameError::InvalidInput(format!(
            "elapsed_ms {} is outside {ELAPSED_MIN_MS}..={ELAPSED_MAX_MS}",
            result.elapsed_ms
        )));
    }

    let category = match result.mode {
        PlayMode::Scene3d => MinigameCategory::Scene3d,
        PlayMode::Classic => game.category,
    };

    Ok(ScoredPlay {
        game,
        category,
        mode: result.mode,
        score: result.score,
        elapsed_ms: result.elapsed_ms,
        success: result.score >= SUCCESS_SCORE,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(game_type: &str, score: u32, elapsed_ms: u64) -> MinigameResult {
        MinigameResult {
            game_type: game_type.to_string(),
            score,
            elapsed_ms,
            mode: PlayMode::Classic,
        }
    }

    #[test]
    fn test_play_mode_names() {
        assert_eq!("classic".parse::<PlayMode>().ok(), Some(PlayMode::Classic));
        assert_eq!("math".parse::<PlayMode>().ok(), Some(PlayMode::Classic));
        assert_eq!("3d".parse::<PlayMode>().ok(), Some(PlayMode::Scene3d));
        assert_eq!("scene3d".parse::<PlayMode>().ok(), Some(PlayMode::Scene3d));
        assert!(matches!("vr".parse::<PlayMode>(), Err(GameError::InvalidInput(_))));
    }

    #[test]
    fn test_success_threshold() {
        assert!(score_play(&result("compare", 3, 4000)).unwrap().success);
        assert!(!score_play(&result("compare", 2, 4000)).unwrap().success);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(
            score_play(&result("chess", 3, 4000)),
            Err(GameError::InvalidInput(_))
        ));
        assert!(score_play(&result("compare", 6, 4000)).is_err());
        assert!(score_play(&result("compare", 3, 499)).is_err());
        assert!(score_play(&result("compare", 3, 120_001)).is_err());
        assert!(score_play(&result("compare", 0, 500)).is_ok());
    }

    #[test]
    fn test_scene3d_overrides_category_and_skips_recovery() {
        let mut r = result("food_catcher", 5, 9000);
        r.mode = PlayMode::Scene3d;
        let play = score_play(&r).unwrap();
        assert_eq!(play.category, MinigameCategory::Scene3d);
        assert_eq!(play.recovery(), None);
    }

    #[test]
    fn test_rewards() {
        let win = score_play(&result("hangman", 5, 9000)).unwrap();
        assert_eq!(win.reward(), Grant::new(15, 10).with_intelligence(2));
        assert_eq!(win.recovery(), Some((12, 4)));
        let loss = score_play(&result("hangman", 1, 9000)).unwrap();
        assert_eq!(loss.reward(), Grant::new(6, 3));
    }
}
