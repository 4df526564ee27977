#![forbid(unsafe_code)]

pub mod local;
pub mod repository;
pub mod rest;
pub mod sqlite;
