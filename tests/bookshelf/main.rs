//! Integration tests for the file-backed book store.

mod durability;
mod scenarios;
mod support;
