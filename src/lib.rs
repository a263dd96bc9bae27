#![cfg_attr(not(doctest), doc = include_str!("../README.md"))]
pub mod local_solver;
pub mod observers;
pub mod optimize;
pub mod problem;
pub mod result;
pub mod startpoint;
pub mod types;
