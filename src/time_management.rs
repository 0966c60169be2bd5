//! Time allocation for a single search: turns UCI `go` parameters into a
//! soft (preferred) and hard (absolute) budget in milliseconds.

#[derive(Clone, Copy, Debug)]
pub struct TimeConfig {
    pub move_overhead_ms: u64,
}

impl Default for TimeConfig {
    fn default() -> Self {
        TimeConfig { move_overhead_ms: 30 }
    }
}

#[derive(Clone, Copy, Debug)]
pub enum TimeControl {
    Infinite,
    Depth(i32),
    MoveTime { time_ms: u64 },
    Incremental { time_left_ms: u64, inc_ms: u64, moves_to_go: Option<u32> },
}

#[derive(Clone, Copy, Debug, Default)]
pub struct TimeBudget {
    pub soft_ms: Option<u64>,
    pub hard_ms: Option<u64>,
    pub depth: Option<i32>,
    pub infinite: bool,
}

/// How much of the game is likely left at `ply`, used to spread the
/// remaining clock over the remaining moves instead of each move getting
/// an equal share.
fn move_importance(ply: u32) -> f64 {
    const X_SCALE: f64 = 7.64;
    const X_SHIFT: f64 = 58.4;
    const SKEW: f64 = 0.183;
    let x = (ply as f64 - X_SHIFT) / X_SCALE;
    (1.0 + x.exp()).powf(-SKEW).max(f64::EPSILON)
}

pub fn compute_budget(ply: u32, config: TimeConfig, control: TimeControl) -> TimeBudget {
    match control {
        TimeControl::Infinite => TimeBudget { infinite: true, ..Default::default() },
        TimeControl::Depth(d) => TimeBudget { depth: Some(d), infinite: true, ..Default::default() },
        TimeControl::MoveTime { time_ms } => {
            let usable = time_ms.saturating_sub(config.move_overhead_ms).max(1);
            TimeBudget { soft_ms: Some(usable), hard_ms: Some(usable), ..Default::default() }
        }
        TimeControl::Incremental { time_left_ms, inc_ms, moves_to_go } => {
            let usable_time = time_left_ms.saturating_sub(config.move_overhead_ms).max(1) as f64;
            let this_move_importance = move_importance(ply);

            let max_moves_to_go = moves_to_go.unwrap_or(50).max(1);
            let mut other_moves_importance_sum = 0.0;
            for i in 1..max_moves_to_go {
                other_moves_importance_sum += move_importance(ply + 2 * i);
            }

            const STEP_RATIO_OPT: f64 = 1.0;
            const STEP_RATIO_MAX: f64 = 7.09;
            const STEAL_RATIO_OPT: f64 = 0.0;
            const STEAL_RATIO_MAX: f64 = 0.35;

            let opt_ratio = (STEP_RATIO_OPT * this_move_importance
                / (STEP_RATIO_OPT * this_move_importance + other_moves_importance_sum))
                .min(1.0 - STEAL_RATIO_OPT);
            let max_ratio = (STEP_RATIO_MAX * this_move_importance
                / (STEP_RATIO_MAX * this_move_importance + other_moves_importance_sum))
                .min(1.0 - STEAL_RATIO_MAX);

            let soft = (usable_time * opt_ratio) as u64 + inc_ms / 2;
            let hard = (usable_time * max_ratio) as u64 + inc_ms;

            TimeBudget {
                soft_ms: Some(soft.max(1)),
                hard_ms: Some(hard.max(soft.max(1))),
                ..Default::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movetime_reserves_overhead() {
        let budget = compute_budget(
            20,
            TimeConfig::default(),
            TimeControl::MoveTime { time_ms: 1000 },
        );
        assert_eq!(budget.hard_ms, Some(970));
    }

    #[test]
    fn infinite_has_no_budget() {
        let budget = compute_budget(20, TimeConfig::default(), TimeControl::Infinite);
        assert!(budget.infinite);
        assert!(budget.hard_ms.is_none());
    }

    #[test]
    fn incremental_hard_exceeds_soft() {
        let budget = compute_budget(
            20,
            TimeConfig::default(),
            TimeControl::Incremental { time_left_ms: 60_000, inc_ms: 1000, moves_to_go: None },
        );
        assert!(budget.hard_ms.unwrap() >= budget.soft_ms.unwrap());
    }

    #[test]
    fn move_importance_is_positive_and_decreasing_late() {
        assert!(move_importance(10) > move_importance(100));
        assert!(move_importance(10) > 0.0);
    }
}
