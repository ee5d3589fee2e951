//! Output sinks for crawl results.
//!
//! One crawl run produces one file. The only sink is CSV ([`csv`]), written
//! to the working directory (or a configured output directory) as
//! `blog_articles_<host>.csv`.

pub mod csv;
