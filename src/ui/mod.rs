pub mod element_model;
pub mod error;
pub mod kind;
pub mod normalizer;
pub mod profile;
