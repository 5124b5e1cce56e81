use tracing::warn;

use crate::app::Vec2;
use crate::display::Rect;

use super::body::{
    Aabb, BodyHandle, DynamicBody, StaticBody, StaticBodyHandle, StaticGroup, StaticGroupId,
};

const CONTACT_EPS: f32 = 0.001;

#[derive(Debug)]
pub struct ArcadeWorld {
    gravity: Vec2,
    bounds: Rect,
    bodies: Vec<DynamicBody>,
    groups: Vec<StaticGroup>,
    colliders: Vec<(BodyHandle, StaticGroupId)>,
    debug: bool,
}

impl ArcadeWorld {
    pub fn new(gravity: Vec2, bounds: Rect) -> Self {
        Self {
            gravity,
            bounds,
            bodies: Vec::new(),
            groups: Vec::new(),
            colliders: Vec::new(),
            debug: false,
        }
    }

    pub fn gravity(&self) -> Vec2 {
        self.gravity
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    pub fn add_dynamic(&mut self, body: DynamicBody) -> BodyHandle {
        self.bodies.push(body);
        BodyHandle(self.bodies.len() - 1)
    }

    pub fn body(&self, handle: BodyHandle) -> Option<&DynamicBody> {
        self.bodies.get(handle.0)
    }

    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut DynamicBody> {
        self.bodies.get_mut(handle.0)
    }

    pub fn add_static_group(&mut self) -> StaticGroupId {
        self.groups.push(StaticGroup::default());
        StaticGroupId(self.groups.len() - 1)
    }

    pub fn add_static(
        &mut self,
        group: StaticGroupId,
        body: StaticBody,
    ) -> Option<StaticBodyHandle> {
        let members = &mut self.groups.get_mut(group.0)?.bodies;
        members.push(body);
        Some(StaticBodyHandle {
            group,
            index: members.len() - 1,
        })
    }

    pub fn static_group(&self, group: StaticGroupId) -> Option<&StaticGroup> {
        self.groups.get(group.0)
    }

    pub fn static_body(&self, handle: StaticBodyHandle) -> Option<&StaticBody> {
        self.groups.get(handle.group.0)?.bodies.get(handle.index)
    }

    pub fn static_body_mut(&mut self, handle: StaticBodyHandle) -> Option<&mut StaticBody> {
        self.groups
            .get_mut(handle.group.0)?
            .bodies
            .get_mut(handle.index)
    }

    pub fn add_collider(&mut self, body: BodyHandle, group: StaticGroupId) -> bool {
        if body.0 >= self.bodies.len() || group.0 >= self.groups.len() {
            warn!(body = body.0, group = group.0, "collider_handle_unknown");
            return false;
        }
        if self.colliders.contains(&(body, group)) {
            return false;
        }
        self.colliders.push((body, group));
        true
    }

    pub fn dynamic_bodies(&self) -> impl Iterator<Item = &DynamicBody> {
        self.bodies.iter()
    }

    pub fn static_bodies(&self) -> impl Iterator<Item = &StaticBody> {
        self.groups.iter().flat_map(|group| group.bodies.iter())
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len() + self.groups.iter().map(StaticGroup::len).sum::<usize>()
    }

    pub fn clear(&mut self) {
        self.bodies.clear();
        self.groups.clear();
        self.colliders.clear();
    }

    pub fn step(&mut self, dt_seconds: f32) {
        if dt_seconds <= 0.0 {
            return;
        }
        let Self {
            gravity,
            bounds,
            bodies,
            groups,
            colliders,
            ..
        } = self;

        for (index, body) in bodies.iter_mut().enumerate() {
            body.touching = Default::default();
            body.blocked = Default::default();

            if body.allow_gravity {
                body.velocity.x += gravity.x * dt_seconds;
                body.velocity.y += gravity.y * dt_seconds;
            }

            let solids: Vec<Aabb> = colliders
                .iter()
                .filter(|(handle, _)| handle.0 == index)
                .filter_map(|(_, group)| groups.get(group.0))
                .flat_map(|group| group.bodies.iter().map(StaticBody::aabb))
                .collect();

            let dx = body.velocity.x * dt_seconds;
            move_x(body, dx, &solids);
            let dy = body.velocity.y * dt_seconds;
            move_y(body, dy, &solids);

            if body.collide_world_bounds {
                clamp_to_bounds(body, *bounds);
            }
        }
    }
}

// A solid stops the body only if the body started on its near side.
fn move_x(body: &mut DynamicBody, dx: f32, solids: &[Aabb]) {
    if dx == 0.0 {
        return;
    }
    let start = body.aabb;
    let mut moved = start;
    moved.center.x += dx;

    let mut stop: Option<f32> = None;
    for solid in solids.iter().filter(|solid| start.overlaps_y(solid, CONTACT_EPS)) {
        if dx > 0.0 {
            if start.right() <= solid.left() + CONTACT_EPS && moved.right() > solid.left() {
                let limit = solid.left() - start.half.x;
                stop = Some(stop.map_or(limit, |current| current.min(limit)));
            }
        } else if start.left() >= solid.right() - CONTACT_EPS && moved.left() < solid.right() {
            let limit = solid.right() + start.half.x;
            stop = Some(stop.map_or(limit, |current| current.max(limit)));
        }
    }

    match stop {
        Some(limit) => {
            body.aabb.center.x = limit;
            body.velocity.x = -body.velocity.x * body.bounce.x;
            if dx > 0.0 {
                body.touching.right = true;
            } else {
                body.touching.left = true;
            }
        }
        None => body.aabb = moved,
    }
}

fn move_y(body: &mut DynamicBody, dy: f32, solids: &[Aabb]) {
    if dy == 0.0 {
        return;
    }
    let start = body.aabb;
    let mut moved = start;
    moved.center.y += dy;

    let mut stop: Option<f32> = None;
    for solid in solids.iter().filter(|solid| start.overlaps_x(solid, CONTACT_EPS)) {
        if dy > 0.0 {
            if start.bottom() <= solid.top() + CONTACT_EPS && moved.bottom() > solid.top() {
                let limit = solid.top() - start.half.y;
                stop = Some(stop.map_or(limit, |current| current.min(limit)));
            }
        } else if start.top() >= solid.bottom() - CONTACT_EPS && moved.top() < solid.bottom() {
            let limit = solid.bottom() + start.half.y;
            stop = Some(stop.map_or(limit, |current| current.max(limit)));
        }
    }

    match stop {
        Some(limit) => {
            body.aabb.center.y = limit;
            body.velocity.y = -body.velocity.y * body.bounce.y;
            if dy > 0.0 {
                body.touching.down = true;
            } else {
                body.touching.up = true;
            }
        }
        None => body.aabb = moved,
    }
}

fn clamp_to_bounds(body: &mut DynamicBody, bounds: Rect) {
    let aabb = body.aabb;
    let right_edge = bounds.x + bounds.width;
    let bottom_edge = bounds.y + bounds.height;

    if aabb.left() < bounds.x {
        body.aabb.center.x = bounds.x + aabb.half.x;
        body.blocked.left = true;
        if body.velocity.x < 0.0 {
            body.velocity.x = -body.velocity.x * body.bounce.x;
        }
    } else if aabb.right() > right_edge {
        body.aabb.center.x = right_edge - aabb.half.x;
        body.blocked.right = true;
        if body.velocity.x > 0.0 {
            body.velocity.x = -body.velocity.x * body.bounce.x;
        }
    }

    if aabb.top() < bounds.y {
        body.aabb.center.y = bounds.y + aabb.half.y;
        body.blocked.up = true;
        if body.velocity.y < 0.0 {
            body.velocity.y = -body.velocity.y * body.bounce.y;
        }
    } else if aabb.bottom() > bottom_edge {
        body.aabb.center.y = bottom_edge - aabb.half.y;
        body.blocked.down = true;
        if body.velocity.y > 0.0 {
            body.velocity.y = -body.velocity.y * body.bounce.y;
        }
    }
}
