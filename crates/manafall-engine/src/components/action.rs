//! Action (animation) state shared by every actor.
//!
//! The simulation only selects the action; playing frames is the host's job.
//! `elapsed` restarts whenever the action changes so the host can restart
//! the matching animation.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Idle,
    Run,
    Jump,
    WallSlide,
    Dash,
    Attack,
    AttackFail,
    /// Enemy patrol movement.
    Walk,
}

impl Action {
    /// Numeric code written into actor records.
    pub fn code(self) -> u32 {
        match self {
            Action::Idle => 0,
            Action::Run => 1,
            Action::Jump => 2,
            Action::WallSlide => 3,
            Action::Dash => 4,
            Action::Attack => 5,
            Action::AttackFail => 6,
            Action::Walk => 7,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionState {
    current: Action,
    elapsed: u32,
}

impl ActionState {
    pub fn new(action: Action) -> Self {
        Self {
            current: action,
            elapsed: 0,
        }
    }

    pub fn current(&self) -> Action {
        self.current
    }

    /// Ticks spent in the current action.
    pub fn elapsed(&self) -> u32 {
        self.elapsed
    }

    /// Switch action. Re-selecting the current action keeps its elapsed count.
    /// Returns whether the action changed.
    pub fn set(&mut self, action: Action) -> bool {
        if self.current == action {
            return false;
        }
        self.current = action;
        self.elapsed = 0;
        true
    }

    pub fn tick(&mut self) {
        self.elapsed = self.elapsed.saturating_add(1);
    }
}

impl Default for ActionState {
    fn default() -> Self {
        Self::new(Action::Idle)
    }
}

/// Snapshot of the player flags that decide its action.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerPose {
    pub attack_locked: bool,
    pub dashing: bool,
    pub wall_slide: bool,
    pub airborne: bool,
    pub moving: bool,
}

/// Pick the player's action. Attack lock keeps whatever action started it.
pub fn select_player_action(current: Action, pose: PlayerPose) -> Action {
    if pose.attack_locked && matches!(current, Action::Attack | Action::AttackFail) {
        return current;
    }
    if pose.dashing {
        Action::Dash
    } else if pose.wall_slide {
        Action::WallSlide
    } else if pose.airborne {
        Action::Jump
    } else if pose.moving {
        Action::Run
    } else {
        Action::Idle
    }
}

/// Enemies only distinguish patrolling from standing still.
pub fn select_enemy_action(moving: bool) -> Action {
    if moving {
        Action::Walk
    } else {
        Action::Idle
    }
}
