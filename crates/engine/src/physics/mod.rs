mod body;
mod world;

pub use body::{
    Aabb, BodyHandle, Contacts, DynamicBody, StaticBody, StaticBodyHandle, StaticGroup,
    StaticGroupId,
};
pub use world::ArcadeWorld;
