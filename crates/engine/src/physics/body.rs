use crate::app::Vec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center: Vec2,
    pub half: Vec2,
}

impl Aabb {
    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            half: Vec2::new(size.x * 0.5, size.y * 0.5),
        }
    }

    pub fn left(&self) -> f32 {
        self.center.x - self.half.x
    }

    pub fn right(&self) -> f32 {
        self.center.x + self.half.x
    }

    pub fn top(&self) -> f32 {
        self.center.y - self.half.y
    }

    pub fn bottom(&self) -> f32 {
        self.center.y + self.half.y
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.half.x * 2.0, self.half.y * 2.0)
    }

    pub(crate) fn overlaps_x(&self, other: &Aabb, eps: f32) -> bool {
        self.right() > other.left() + eps && self.left() < other.right() - eps
    }

    pub(crate) fn overlaps_y(&self, other: &Aabb, eps: f32) -> bool {
        self.bottom() > other.top() + eps && self.top() < other.bottom() - eps
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Contacts {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Contacts {
    pub fn none(&self) -> bool {
        !(self.up || self.down || self.left || self.right)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StaticGroupId(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StaticBodyHandle {
    pub group: StaticGroupId,
    pub(crate) index: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DynamicBody {
    pub(crate) aabb: Aabb,
    pub velocity: Vec2,
    pub bounce: Vec2,
    pub allow_gravity: bool,
    pub collide_world_bounds: bool,
    /// Contacts with colliding static bodies during the last step.
    pub touching: Contacts,
    /// Contacts with the world bounds during the last step.
    pub blocked: Contacts,
}

impl DynamicBody {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self {
            aabb: Aabb::from_center_size(center, size),
            velocity: Vec2::default(),
            bounce: Vec2::default(),
            allow_gravity: true,
            collide_world_bounds: false,
            touching: Contacts::default(),
            blocked: Contacts::default(),
        }
    }

    pub fn position(&self) -> Vec2 {
        self.aabb.center
    }

    pub fn set_position(&mut self, center: Vec2) {
        self.aabb.center = center;
    }

    pub fn aabb(&self) -> Aabb {
        self.aabb
    }

    pub fn set_velocity_x(&mut self, vx: f32) {
        self.velocity.x = vx;
    }

    pub fn set_velocity_y(&mut self, vy: f32) {
        self.velocity.y = vy;
    }

    pub fn set_bounce(&mut self, bounce: f32) {
        self.bounce = Vec2::new(bounce, bounce);
    }

    pub fn set_collide_world_bounds(&mut self, collide: bool) {
        self.collide_world_bounds = collide;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StaticBody {
    pub(crate) aabb: Aabb,
}

impl StaticBody {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self {
            aabb: Aabb::from_center_size(center, size),
        }
    }

    pub fn aabb(&self) -> Aabb {
        self.aabb
    }

    pub fn refresh(&mut self, center: Vec2, size: Vec2) {
        self.aabb = Aabb::from_center_size(center, size);
    }
}

#[derive(Debug, Clone, Default)]
pub struct StaticGroup {
    pub(crate) bodies: Vec<StaticBody>,
}

impl StaticGroup {
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn bodies(&self) -> &[StaticBody] {
        &self.bodies
    }
}
