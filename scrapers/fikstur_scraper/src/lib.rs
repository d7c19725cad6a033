pub mod config;
pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod fixture_scraper;
pub mod types;
pub mod web;
