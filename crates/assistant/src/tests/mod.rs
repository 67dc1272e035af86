//! End-to-end pipeline scenarios driven by in-process fakes.

mod fakes;
