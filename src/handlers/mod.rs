// src/handlers/mod.rs

pub mod admin;
pub mod course;
pub mod glossary;
pub mod progress;
pub mod quiz;
pub mod tool;
