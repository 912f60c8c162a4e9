//! Output generation for scraped batches.
//!
//! # Submodules
//!
//! - [`csv`]: writes article records as a CSV table
//!
//! # Output Structure
//!
//! ```text
//! Data/news_data/
//! ├── news_results.csv       # noticias category
//! └── articles_results.csv   # reportagens category
//! ```

pub mod csv;
