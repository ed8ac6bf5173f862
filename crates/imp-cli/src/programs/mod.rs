//! The canonical sample programs, written in IMP against the public
//! construction API. They exercise the whole stack (io, strings,
//! lambdas, references, switch) and double as end-to-end fixtures.

mod calculator;
mod hello_world;
mod mergesort;

pub use calculator::calculator;
pub use hello_world::{hello_world, Language};
pub use mergesort::mergesort;
