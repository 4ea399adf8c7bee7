//! Reusable package recipes craftfiles can call into, the way the original
//! tool shipped a small library of common third-party dependencies.

pub mod boost;
