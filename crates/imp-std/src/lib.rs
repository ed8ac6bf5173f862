//! The IMP standard library.
//!
//! These are not interpreter features: everything here is an ordinary
//! IR fragment built from `imp_core`'s constructors, the way a user
//! program would write it. The fragments use reserved [`Marker`] scratch
//! variables so they cannot collide with program names.
//!
//! [`Marker`]: imp_core::value::Marker

pub mod io;
pub mod strings;
