//! Reusable UI widgets
//!
//! Contains components shared by the picker views.

pub mod selection;
