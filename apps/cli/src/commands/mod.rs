//! # Commands
//!
//! ```text
//! commands/
//! ├── config.rs     ◄─── config show / init
//! ├── catalog.rs    ◄─── product types, identifier assignment
//! ├── price.rs      ◄─── price form (list price / discount / final)
//! ├── sales.rs      ◄─── pending sales, export
//! ├── stock.rs      ◄─── stock report, reorder points, ingresses
//! ├── cash.rs       ◄─── daily cash count
//! └── dashboard.rs  ◄─── sales totals over a range
//! ```

pub mod cash;
pub mod catalog;
pub mod config;
pub mod dashboard;
pub mod price;
pub mod sales;
pub mod stock;

/// Today in local time; default date of sales, ingresses and cash counts.
pub fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}
