//! Sample IMP programs and the pieces of the driver worth reusing from
//! tests.

pub mod programs;
