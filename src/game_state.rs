use serde::{Deserialize, Serialize};

use crate::event::{Event, EventType, Side};

// NBA clock: 12 min regulation periods, 5 min overtime.
pub const SECONDS_PER_REGULATION_PERIOD: u32 = 12 * 60;
pub const SECONDS_PER_OT_PERIOD: u32 = 5 * 60;

/// Total seconds left in the game given the current period and period clock.
/// Regulation is periods 1-4; period 5+ is overtime, where only the current
/// OT clock remains (further overtimes do not exist until forced).
pub fn game_seconds_remaining(period: u32, period_clock: u32) -> u32 {
    if period == 0 {
        return 4 * SECONDS_PER_REGULATION_PERIOD;
    }
    if period <= 4 {
        return (4 - period) * SECONDS_PER_REGULATION_PERIOD + period_clock;
    }
    period_clock
}

pub fn period_length(period: u32) -> u32 {
    if period <= 4 {
        SECONDS_PER_REGULATION_PERIOD
    } else {
        SECONDS_PER_OT_PERIOD
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Possession {
    Home,
    Away,
    Unknown,
}

impl Possession {
    pub fn from_side(side: Side) -> Possession {
        match side {
            Side::Home => Possession::Home,
            Side::Away => Possession::Away,
        }
    }

    /// 1/0 indicator for the feature vector; `None` when undetermined.
    pub fn home_indicator(self) -> Option<u8> {
        match self {
            Possession::Home => Some(1),
            Possession::Away => Some(0),
            Possession::Unknown => None,
        }
    }
}

/// Running snapshot of one game during replay: period clock, cumulative
/// score, and best-effort possession. Owned by exactly one replay fold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameState {
    pub period: u32,
    pub time_remaining_sec: u32,
    pub home_score: u32,
    pub away_score: u32,
    pub possession: Possession,
    pub is_home_court: bool,
}

impl GameState {
    /// State at tip-off: period 1, full clock, 0-0. Possession is unknown
    /// until the opening jump ball attributes it.
    pub fn tip_off() -> GameState {
        GameState {
            period: 1,
            time_remaining_sec: SECONDS_PER_REGULATION_PERIOD,
            home_score: 0,
            away_score: 0,
            possession: Possession::Unknown,
            is_home_court: true,
        }
    }

    pub fn score_diff(&self) -> i64 {
        self.home_score as i64 - self.away_score as i64
    }

    pub fn game_seconds_remaining(&self) -> u32 {
        game_seconds_remaining(self.period, self.time_remaining_sec)
    }

    /// Apply one event and return the next state. Total over the whole event
    /// vocabulary: unknown event types update clock and period only.
    ///
    /// Scores are copied from the event's cumulative fields rather than
    /// incremented locally, so a missed event cannot make the score drift.
    pub fn apply(&self, event: &Event) -> GameState {
        let mut next = *self;
        next.period = event.period;
        next.time_remaining_sec = match event.event_type {
            EventType::PeriodStart | EventType::PeriodEnd => period_length(event.period),
            _ => event.time_remaining_sec,
        };

        match event.event_type {
            EventType::Made2
            | EventType::Made3
            | EventType::Miss2
            | EventType::Miss3
            | EventType::FreeThrowMade
            | EventType::FreeThrowMiss => {
                next.home_score = event.home_score;
                next.away_score = event.away_score;
            }
            _ => {}
        }

        next.possession = infer_possession(self.possession, event);
        next
    }
}

/// Best-effort possession inference. A make or turnover by one side hands
/// the ball to the other; a rebound keeps it with the rebounding side; a
/// jump ball goes to whoever won it. When the event carries no attributed
/// side the flip target is unknowable and the result degrades to Unknown.
fn infer_possession(prev: Possession, event: &Event) -> Possession {
    let side = event.possession;
    match event.event_type {
        EventType::Made2 | EventType::Made3 | EventType::FreeThrowMade | EventType::Turnover => {
            match side {
                Some(s) => Possession::from_side(s.opponent()),
                None => Possession::Unknown,
            }
        }
        EventType::Rebound | EventType::JumpBall => match side {
            Some(s) => Possession::from_side(s),
            None => Possession::Unknown,
        },
        _ => prev,
    }
}
