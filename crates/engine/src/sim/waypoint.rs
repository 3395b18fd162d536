use super::geometry::Vec2;

/// A waypoint counts as reached once the mover is strictly closer than this.
pub const ARRIVAL_RADIUS: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoverState {
    Idle,
    FollowingPermanentPath,
    FollowingTemporaryPoint,
    FollowingTemporaryPath,
}

#[derive(Debug, Clone, PartialEq)]
struct TemporaryPath {
    points: Vec<Vec2>,
    next_index: usize,
    stop_at_end: bool,
}

impl TemporaryPath {
    fn current(&self) -> Option<Vec2> {
        self.points.get(self.next_index).copied()
    }
}

/// Patrol state for a mobile NPC: a looping permanent path with optional
/// temporary overrides layered on top.
#[derive(Debug, Clone, PartialEq)]
pub struct WaypointMover {
    speed: Vec2,
    movable: bool,
    follow_path: Vec<Vec2>,
    path_index: usize,
    destination: Vec2,
    temp_destination: Option<Vec2>,
    stop_at_temp_destination: bool,
    temp_path: Option<TemporaryPath>,
}

impl WaypointMover {
    pub fn new(speed: Vec2, follow_path: Vec<Vec2>, movable: bool) -> Self {
        let destination = follow_path.first().copied().unwrap_or_default();
        Self {
            speed,
            movable,
            follow_path,
            path_index: 0,
            destination,
            temp_destination: None,
            stop_at_temp_destination: false,
            temp_path: None,
        }
    }

    pub fn state(&self) -> MoverState {
        if !self.movable {
            MoverState::Idle
        } else if self.temp_path.is_some() {
            MoverState::FollowingTemporaryPath
        } else if self.temp_destination.is_some() {
            MoverState::FollowingTemporaryPoint
        } else {
            MoverState::FollowingPermanentPath
        }
    }

    pub fn speed(&self) -> Vec2 {
        self.speed
    }

    pub fn is_movable(&self) -> bool {
        self.movable
    }

    pub fn set_movable(&mut self, movable: bool) {
        self.movable = movable;
    }

    pub fn path_index(&self) -> usize {
        self.path_index
    }

    pub fn has_follow_path(&self) -> bool {
        !self.follow_path.is_empty()
    }

    pub fn follow_path(&self) -> &[Vec2] {
        &self.follow_path
    }

    /// Replaces the permanent patrol loop and restarts it from the first point.
    pub fn set_follow_path(&mut self, follow_path: Vec<Vec2>) {
        self.follow_path = follow_path;
        self.path_index = 0;
    }

    /// Target chosen on the most recent tick.
    pub fn current_destination(&self) -> Vec2 {
        self.destination
    }

    pub fn temp_destination(&self) -> Option<Vec2> {
        self.temp_destination
    }

    pub fn has_temp_path(&self) -> bool {
        self.temp_path.is_some()
    }

    /// Sets or clears the temporary point. Setting one makes the mover movable
    /// again; clearing leaves movability alone.
    pub fn set_temp_destination(&mut self, destination: Option<Vec2>, stop_on_arrival: bool) {
        self.stop_at_temp_destination = stop_on_arrival;
        self.temp_destination = destination;
        if destination.is_some() {
            self.movable = true;
        }
    }

    /// Installs a temporary path, replacing any earlier one along with its
    /// stop flag. An empty list clears the override.
    pub fn set_temp_path(&mut self, points: Vec<Vec2>, stop_at_end: bool) {
        if points.is_empty() {
            self.temp_path = None;
            return;
        }
        self.temp_path = Some(TemporaryPath {
            points,
            next_index: 0,
            stop_at_end,
        });
        self.movable = true;
    }

    /// Advances one tick. Moves `position` toward the active target and
    /// returns the unit direction travelled, or zero when nothing moved.
    pub fn step(&mut self, position: &mut Vec2) -> Vec2 {
        if !self.movable {
            return Vec2::ZERO;
        }

        let target = self.resolve_target(*position);
        self.destination = target;

        let Some(direction) = (target - *position).normalized() else {
            return Vec2::ZERO;
        };
        *position += direction.scale_by(self.speed);
        direction
    }

    fn resolve_target(&mut self, position: Vec2) -> Vec2 {
        if let Some(path) = self.temp_path.as_mut() {
            if let Some(point) = path.current() {
                if has_arrived(position, point) {
                    path.next_index += 1;
                }
            }
            if let Some(point) = path.current() {
                return point;
            }

            let stop = path.stop_at_end;
            self.temp_path = None;
            if stop {
                self.movable = false;
                return position;
            }
            self.path_index = 0;
        }

        if let Some(point) = self.temp_destination {
            if !has_arrived(position, point) {
                return point;
            }
            if self.stop_at_temp_destination {
                // Halt but keep the point; once re-enabled the next tick
                // clears it and the patrol resumes.
                self.stop_at_temp_destination = false;
                self.movable = false;
                return position;
            }
            self.temp_destination = None;
        }

        let Some(point) = self.follow_path.get(self.path_index).copied() else {
            return position;
        };
        if !has_arrived(position, point) {
            return point;
        }
        self.path_index = (self.path_index + 1) % self.follow_path.len();
        self.follow_path[self.path_index]
    }
}

fn has_arrived(position: Vec2, target: Vec2) -> bool {
    position.distance(target) < ARRIVAL_RADIUS
}
