//! Records exchanged with the store.
//!
//! Each kind has a create request, an update request (every field optional, `None` keeps the
//! stored value) and a response. These are distinct from the API models in
//! [`crate::api::models`] so storage and wire representations can evolve independently.
//!
//! - [`dish_types`]: Dish categories, with the number of dishes that reference them
//! - [`cooks`]: Kitchen staff, who are also the accounts that log in
//! - [`dishes`]: Dishes with their type and the cooks who prepare them

pub mod cooks;
pub mod dish_types;
pub mod dishes;
