//! orderstats: descriptive statistics over e-commerce order exports

pub mod cli;
pub mod parsers;
pub mod services;
pub mod types;
