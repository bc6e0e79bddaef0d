pub mod graph;
pub mod link;
pub mod member;
pub mod snapshot;

pub use graph::{LinkChange, MemberGraph};
pub use link::{Link, canonical_pair};
pub use member::Member;
pub use snapshot::Snapshot;
