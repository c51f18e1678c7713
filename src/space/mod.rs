//! Variable space builder.
//!
//! Joins catalog entities on their compatibility predicates (room type equals
//! course type, teacher specialized in the course) and creates one boolean
//! variable per legal tuple:
//!
//! - `X[group, course, slot, room]`: group occupancy
//! - `Y[teacher, course, slot, room]`: teacher occupancy
//! - `W[group, course, teacher, slot, room]`: joint assignment
//!
//! Incompatible tuples are never materialized, so compatibility needs no
//! constraint of its own.

mod builder;
mod keys;

pub use builder::VariableSpace;
pub use keys::{GroupVarKey, JointVarKey, TeacherVarKey, VarOrigin};
