//! # warta-entity
//!
//! Domain entity models for the Warta notification hub. Every struct in
//! this crate represents a document in the hosted record store or a domain
//! value object. All entities derive `Debug`, `Clone`, `Serialize`, and
//! `Deserialize`.

pub mod budget;
pub mod decree;
pub mod notification;
pub mod user;
