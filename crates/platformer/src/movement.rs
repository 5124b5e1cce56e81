pub(crate) const RUN_SPEED: f32 = 160.0;
pub(crate) const JUMP_SPEED: f32 = 330.0;
pub(crate) const PROGRESS_BAR_MAX_WIDTH: f32 = 300.0;

pub(crate) fn horizontal_velocity(left: bool, right: bool) -> f32 {
    if left {
        -RUN_SPEED
    } else if right {
        RUN_SPEED
    } else {
        0.0
    }
}

pub(crate) fn should_jump(up: bool, touching_down: bool) -> bool {
    up && touching_down
}

pub(crate) fn resolve_flip_x(velocity_x: f32, current: bool) -> bool {
    if velocity_x < 0.0 {
        true
    } else if velocity_x > 0.0 {
        false
    } else {
        current
    }
}

pub(crate) fn progress_bar_width(fraction: f32) -> f32 {
    PROGRESS_BAR_MAX_WIDTH * fraction
}
