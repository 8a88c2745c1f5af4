//! Scheduling for one level run
//!
//! Two independent clocks feed the same [`GameState`]:
//! - the frame clock, whose variable real time is turned into fixed
//!   `SIM_DT` ticks by an accumulator (frame time capped at `MAX_FRAME_DT`,
//!   at most `MAX_SUBSTEPS` ticks per frame)
//! - the 1 Hz countdown, accumulated separately from uncapped frame time so
//!   it ticks once per real second whatever the frame rate
//!
//! Both are stopped together: explicitly via [`Session::stop`], or
//! automatically once the run reaches a terminal phase. A stopped session
//! never touches its state again until restarted.

use crate::catalog::{Era, Level, LevelCatalog};
use crate::consts::*;
use crate::error::CatalogError;
use crate::sim::{GameEvent, GameState, TickInput, countdown_tick, restart, tick};
use crate::tuning::Tuning;

/// One level run plus its clocks
#[derive(Debug, Clone)]
pub struct Session {
    level: Level,
    tuning: Tuning,
    state: GameState,
    /// Unsimulated frame time (seconds)
    accumulator: f32,
    /// Time since the last countdown tick (seconds)
    countdown_accumulator: f32,
    running: bool,
    /// Fixed ticks run by the last `advance`
    steps_last_frame: u32,
}

impl Session {
    /// Start running `level`
    pub fn new(level: Level, tuning: Tuning) -> Self {
        log::info!(
            "Starting level {}/{} ({} platforms, {} coins)",
            level.era,
            level.id,
            level.platforms.len(),
            level.coins.len()
        );
        let state = GameState::new(&level, &tuning);
        Self {
            level,
            tuning,
            state,
            accumulator: 0.0,
            countdown_accumulator: 0.0,
            running: true,
            steps_last_frame: 0,
        }
    }

    /// Start `(era, id)` from a catalog
    pub fn from_catalog(
        catalog: &LevelCatalog,
        era: Era,
        id: u32,
        tuning: Tuning,
    ) -> Result<Self, CatalogError> {
        let level = catalog.require(era, id)?.clone();
        Ok(Self::new(level, tuning))
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn steps_last_frame(&self) -> u32 {
        self.steps_last_frame
    }

    /// Feed `real_dt` seconds of frame time with the current key snapshot.
    ///
    /// Runs as many fixed ticks as the accumulated time allows and any
    /// countdown ticks that came due, then returns the events raised.
    pub fn advance(&mut self, real_dt: f32, input: &TickInput) -> Vec<GameEvent> {
        self.steps_last_frame = 0;
        if !self.running {
            return Vec::new();
        }

        let real_dt = real_dt.max(0.0);
        let sim_dt = if real_dt > MAX_FRAME_DT {
            log::warn!(
                "Frame took {:.1}ms, capping to {:.0}ms",
                real_dt * 1000.0,
                MAX_FRAME_DT * 1000.0
            );
            MAX_FRAME_DT
        } else {
            real_dt
        };

        self.accumulator += sim_dt;
        while self.accumulator >= SIM_DT && self.steps_last_frame < MAX_SUBSTEPS {
            tick(&mut self.state, input, &self.tuning, SIM_DT);
            self.accumulator -= SIM_DT;
            self.steps_last_frame += 1;
            if self.state.is_terminal() {
                break;
            }
        }
        // Backlog past the substep cap is dropped, not carried into later frames
        if self.steps_last_frame == MAX_SUBSTEPS && self.accumulator >= SIM_DT {
            log::debug!(
                "Dropping {:.1}ms of simulation backlog",
                self.accumulator * 1000.0
            );
            self.accumulator = 0.0;
        }

        // The countdown follows real time, stalls included
        self.countdown_accumulator += real_dt;
        while self.countdown_accumulator >= COUNTDOWN_PERIOD && !self.state.is_terminal() {
            self.countdown_accumulator -= COUNTDOWN_PERIOD;
            countdown_tick(&mut self.state);
        }

        self.stop_if_finished();
        self.state.drain_events()
    }

    /// One countdown tick from a host-owned 1 Hz timer (instead of the
    /// accumulator in [`Self::advance`])
    pub fn countdown(&mut self) -> Vec<GameEvent> {
        if !self.running {
            return Vec::new();
        }
        countdown_tick(&mut self.state);
        self.stop_if_finished();
        self.state.drain_events()
    }

    /// Halt both clocks. Safe to call more than once.
    pub fn stop(&mut self) {
        if self.running {
            log::debug!("Stopping level {}/{}", self.level.era, self.level.id);
            self.running = false;
        }
    }

    /// Fresh run of the same level, clocks restarted
    pub fn restart(&mut self) {
        restart(&mut self.state, &self.level, &self.tuning);
        self.reset_clocks();
    }

    /// Fresh run of another level
    pub fn switch_level(&mut self, level: Level) {
        self.level = level;
        self.restart();
    }

    fn reset_clocks(&mut self) {
        self.accumulator = 0.0;
        self.countdown_accumulator = 0.0;
        self.steps_last_frame = 0;
        self.running = true;
    }

    fn stop_if_finished(&mut self) {
        if self.state.is_terminal() {
            self.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::sim::{Coin, GameOverCause, GamePhase, Platform};

    fn level() -> Level {
        Level {
            id: 1,
            era: Era::Old,
            description: String::new(),
            player_start: Vec2::new(0.0, 100.0),
            time_limit: 3,
            platforms: vec![Platform::new(0.0, 150.0, 800.0, 10.0)],
            coins: vec![Coin::new("far", 700.0, 110.0, 20.0)],
            total_coins: 1,
        }
    }

    #[test]
    fn test_fixed_steps_per_frame() {
        let mut session = Session::new(level(), Tuning::default());
        // 60 Hz display: one tick per frame (plus/minus accumulator drift)
        let mut total = 0;
        for _ in 0..60 {
            session.advance(1.0 / 60.0, &TickInput::default());
            total += session.steps_last_frame();
        }
        assert!((59..=60).contains(&total));

        // 30 Hz display: two ticks per frame
        let mut session = Session::new(level(), Tuning::default());
        session.advance(1.0 / 60.0 + 0.001, &TickInput::default());
        session.advance(2.0 / 60.0, &TickInput::default());
        assert_eq!(session.steps_last_frame(), 2);
    }

    #[test]
    fn test_substeps_are_capped() {
        let mut level = level();
        level.time_limit = 30;
        let mut session = Session::new(level, Tuning::default());
        // A 5s stall is capped to MAX_FRAME_DT, still worth more than the cap
        session.advance(5.0, &TickInput::default());
        assert_eq!(session.steps_last_frame(), MAX_SUBSTEPS);
        assert_eq!(session.state().time_ticks, u64::from(MAX_SUBSTEPS));

        // The dropped backlog does not spill into the next frame
        session.advance(SIM_DT, &TickInput::default());
        assert_eq!(session.steps_last_frame(), 1);
    }

    #[test]
    fn test_countdown_keeps_real_time_through_stalls() {
        let mut level = level();
        level.time_limit = 30;
        let mut session = Session::new(level, Tuning::default());
        for _ in 0..5 {
            session.advance(1.0, &TickInput::default());
        }
        assert_eq!(session.state().time_remaining, 25);

        // A single long stall catches up every whole second
        session.advance(4.5, &TickInput::default());
        assert_eq!(session.state().time_remaining, 21);
    }

    #[test]
    fn test_same_motion_at_any_frame_rate() {
        let right = TickInput {
            right: true,
            ..Default::default()
        };

        let mut fast = Session::new(level(), Tuning::default());
        for _ in 0..120 {
            fast.advance(1.0 / 120.0, &right);
        }
        let mut slow = Session::new(level(), Tuning::default());
        for _ in 0..30 {
            slow.advance(1.0 / 30.0, &right);
        }

        let ticks_fast = fast.state().time_ticks as f32;
        let ticks_slow = slow.state().time_ticks as f32;
        assert!((ticks_fast - ticks_slow).abs() <= 1.0);
        let dx = (fast.state().player.pos.x - slow.state().player.pos.x).abs();
        assert!(dx <= fast.tuning().move_speed + 0.01);
    }

    #[test]
    fn test_countdown_accumulates_real_seconds() {
        let mut session = Session::new(level(), Tuning::default());
        for _ in 0..30 {
            session.advance(0.05, &TickInput::default());
        }
        // 1.5s elapsed
        assert_eq!(session.state().time_remaining, 2);
    }

    #[test]
    fn test_time_out_stops_session() {
        let mut session = Session::new(level(), Tuning::default());
        let mut events = Vec::new();
        for _ in 0..80 {
            events.extend(session.advance(0.05, &TickInput::default()));
        }
        assert_eq!(session.state().time_remaining, 0);
        assert_eq!(session.state().phase, GamePhase::GameOver(GameOverCause::OutOfTime));
        assert!(!session.is_running());
        assert_eq!(
            events.iter().filter(|e| matches!(e, GameEvent::GameOver(_))).count(),
            1
        );

        let frozen = session.state().clone();
        assert!(session.advance(0.05, &TickInput::default()).is_empty());
        assert!(session.countdown().is_empty());
        assert_eq!(session.state(), &frozen);
    }

    #[test]
    fn test_host_countdown() {
        let mut session = Session::new(level(), Tuning::default());
        session.countdown();
        session.countdown();
        assert_eq!(session.state().time_remaining, 1);
        let events = session.countdown();
        assert_eq!(events, vec![GameEvent::GameOver(GameOverCause::OutOfTime)]);
        assert!(!session.is_running());
    }

    #[test]
    fn test_stop_is_idempotent_and_freezes() {
        let mut session = Session::new(level(), Tuning::default());
        session.advance(0.1, &TickInput::default());
        session.stop();
        session.stop();
        let frozen = session.state().clone();
        session.advance(0.1, &TickInput::default());
        assert_eq!(session.state(), &frozen);
        assert_eq!(session.steps_last_frame(), 0);
    }

    #[test]
    fn test_completion_stops_session() {
        let mut level = level();
        level.coins = vec![Coin::new("here", 10.0, 110.0, 20.0)];
        let mut session = Session::new(level, Tuning::default());
        let events = session.advance(0.05, &TickInput::default());
        assert!(events.contains(&GameEvent::LevelComplete));
        assert!(session.state().is_level_complete());
        assert!(!session.is_running());
        // Terminal tick stops the substep loop early
        assert_eq!(session.steps_last_frame(), 1);
    }

    #[test]
    fn test_restart_resumes_clocks() {
        let mut session = Session::new(level(), Tuning::default());
        session.countdown();
        session.countdown();
        session.countdown();
        assert!(!session.is_running());

        session.restart();
        assert!(session.is_running());
        assert!(session.state().is_playing());
        assert_eq!(session.state().time_remaining, 3);
        assert_eq!(session.state().lives, 3);
    }

    #[test]
    fn test_from_catalog() {
        let catalog = LevelCatalog::builtin().unwrap();
        let session = Session::from_catalog(&catalog, Era::Current, 2, Tuning::default()).unwrap();
        assert_eq!(session.level().id, 2);
        assert_eq!(session.state().time_remaining, 90);

        let missing = Session::from_catalog(&catalog, Era::Current, 42, Tuning::default());
        assert!(matches!(missing, Err(CatalogError::UnknownLevel { .. })));
    }

    #[test]
    fn test_switch_level() {
        let catalog = LevelCatalog::builtin().unwrap();
        let mut session = Session::from_catalog(&catalog, Era::Old, 1, Tuning::default()).unwrap();
        let next = catalog.next_after(Era::Old, 1).unwrap().clone();
        session.switch_level(next);
        assert_eq!((session.level().era, session.level().id), (Era::Old, 2));
        assert_eq!(session.state().coins.len(), 5);
    }
}
