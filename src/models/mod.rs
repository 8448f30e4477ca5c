//! Resource and relation kinds shared by the graph store and the builder

pub mod relation_kind;
pub mod resource_kind;

pub use relation_kind::RelationKind;
pub use resource_kind::ResourceKind;
