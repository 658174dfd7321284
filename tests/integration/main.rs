//! Integration tests for Casa-Ripple
//!
//! These tests use wiremock to serve a miniature listing site and run the
//! whole crawl, including the CSV export, against it.

mod crawl_tests;
