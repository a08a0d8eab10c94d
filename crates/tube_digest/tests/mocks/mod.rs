#![allow(dead_code)]

pub mod providers;
pub mod transcripts;
