mod entity;
mod order;
mod product;

pub use entity::{ChildEntity, Entity, EntityRecord, EntityType, ParentEntity, RootEntity};
pub use order::{Order, OrderItem, OrderStatus, User};
pub use product::{Product, ProductOption};
