//! Unit tests, one file per source module
