pub mod cache;
pub mod charts;
pub mod dashboard;
pub mod data_loader;
pub mod fetch;
pub mod title_fetcher;
pub mod url_parser;

#[cfg(test)]
pub mod testing;
