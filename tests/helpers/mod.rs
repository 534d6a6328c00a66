#![allow(dead_code)]

pub mod node_helpers;
pub mod source_fixtures;
pub mod workspace;
