// src/models/mod.rs

pub mod course;
pub mod glossary;
pub mod progress;
pub mod quiz;
pub mod tool;
