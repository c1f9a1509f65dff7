//! Repository services, one per collection.
//!
//! Each service turns a catalog operation into a single document-store call, plus the
//! reference lookups needed to expand a record on read.

pub mod ingredients;
pub mod recipe_ingredients;
pub mod recipes;
pub mod shared;
