//! Level progress: lives, countdown and terminal phases
//!
//! `Playing` is the only non-terminal phase. It ends in `LevelComplete`
//! when the last coin is collected, or in `GameOver` when the player runs
//! out of lives or time. Nothing leaves a terminal phase except
//! [`restart`], which rebuilds the run from scratch.

use super::state::{GameEvent, GameOverCause, GamePhase, GameState};
use crate::catalog::Level;
use crate::tuning::Tuning;

/// Advance the countdown by one second.
///
/// Driven by its own 1 Hz clock, independent of the frame rate. Touches
/// only `time_remaining` and `phase`; a no-op once the run is terminal.
pub fn countdown_tick(state: &mut GameState) {
    if state.is_terminal() {
        return;
    }

    state.time_remaining = state.time_remaining.saturating_sub(1);
    if state.time_remaining == 0 {
        end_game(state, GameOverCause::OutOfTime);
    }
}

/// Take one life; running out ends the game
pub fn lose_life(state: &mut GameState) {
    state.lives = state.lives.saturating_sub(1);
    log::debug!("Life lost, {} remaining", state.lives);
    if state.lives == 0 {
        end_game(state, GameOverCause::OutOfLives);
    }
}

/// Enter `GameOver`. Only the first call counts: the timer and a fatal
/// fall may both end the run in the same instant.
pub fn end_game(state: &mut GameState, cause: GameOverCause) {
    if !state.is_playing() {
        return;
    }
    state.phase = GamePhase::GameOver(cause);
    state.emit(GameEvent::GameOver(cause));
    log::info!("Game over: {:?}", cause);
}

/// Enter `LevelComplete` if every coin has been collected
pub fn check_completion(state: &mut GameState) {
    if state.is_playing() && state.all_coins_collected() {
        state.phase = GamePhase::LevelComplete;
        state.emit(GameEvent::LevelComplete);
        log::info!(
            "Level complete with {} coins and {}s to spare",
            state.coins_collected(),
            state.time_remaining
        );
    }
}

/// Replace `state` with a fresh run of `level`
pub fn restart(state: &mut GameState, level: &Level, tuning: &Tuning) {
    log::info!("Restarting level {}/{}", level.era, level.id);
    *state = GameState::new(level, tuning);
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::catalog::Era;
    use crate::sim::Coin;

    fn level() -> Level {
        Level {
            id: 2,
            era: Era::Current,
            description: String::new(),
            player_start: Vec2::new(0.0, 0.0),
            time_limit: 30,
            platforms: Vec::new(),
            coins: vec![Coin::new("a", 500.0, 500.0, 10.0)],
            total_coins: 1,
        }
    }

    #[test]
    fn test_countdown_decrements() {
        let mut state = GameState::new(&level(), &Tuning::default());
        countdown_tick(&mut state);
        assert_eq!(state.time_remaining, 29);
        assert!(state.is_playing());
    }

    #[test]
    fn test_countdown_expiry_ends_game() {
        let mut state = GameState::new(&level(), &Tuning::default());
        state.time_remaining = 1;
        countdown_tick(&mut state);
        assert_eq!(state.time_remaining, 0);
        assert!(state.is_game_over());
        assert_eq!(state.phase, GamePhase::GameOver(GameOverCause::OutOfTime));
        assert_eq!(state.drain_events(), vec![GameEvent::GameOver(GameOverCause::OutOfTime)]);
    }

    #[test]
    fn test_countdown_stops_when_terminal() {
        let mut state = GameState::new(&level(), &Tuning::default());
        state.phase = GamePhase::LevelComplete;
        countdown_tick(&mut state);
        assert_eq!(state.time_remaining, 30);
    }

    #[test]
    fn test_countdown_never_touches_lives_or_position() {
        let mut state = GameState::new(&level(), &Tuning::default());
        let before = state.player.clone();
        for _ in 0..10 {
            countdown_tick(&mut state);
        }
        assert_eq!(state.lives, 3);
        assert_eq!(state.player, before);
    }

    #[test]
    fn test_last_life_ends_game() {
        let mut state = GameState::new(&level(), &Tuning::default());
        state.lives = 1;
        lose_life(&mut state);
        assert_eq!(state.lives, 0);
        assert_eq!(state.phase, GamePhase::GameOver(GameOverCause::OutOfLives));
    }

    #[test]
    fn test_end_game_is_idempotent() {
        let mut state = GameState::new(&level(), &Tuning::default());
        end_game(&mut state, GameOverCause::OutOfTime);
        end_game(&mut state, GameOverCause::OutOfLives);
        assert_eq!(state.phase, GamePhase::GameOver(GameOverCause::OutOfTime));
        assert_eq!(state.drain_events().len(), 1);
    }

    #[test]
    fn test_completion_requires_every_coin() {
        let mut state = GameState::new(&level(), &Tuning::default());
        check_completion(&mut state);
        assert!(state.is_playing());

        state.collected_coin_ids.insert("a".to_string());
        check_completion(&mut state);
        assert!(state.is_level_complete());
    }

    #[test]
    fn test_completion_cannot_override_game_over() {
        let mut state = GameState::new(&level(), &Tuning::default());
        state.collected_coin_ids.insert("a".to_string());
        end_game(&mut state, GameOverCause::OutOfLives);
        check_completion(&mut state);
        assert!(state.is_game_over());
        assert!(!state.is_level_complete());
    }

    #[test]
    fn test_restart_resets_run() {
        let level = level();
        let tuning = Tuning::default();
        let mut state = GameState::new(&level, &tuning);
        state.lives = 0;
        state.time_remaining = 3;
        state.collected_coin_ids.insert("a".to_string());
        state.phase = GamePhase::GameOver(GameOverCause::OutOfLives);

        restart(&mut state, &level, &tuning);
        assert_eq!(state, GameState::new(&level, &tuning));
    }
}
