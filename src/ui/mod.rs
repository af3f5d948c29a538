pub mod icons;
pub mod output;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{
    error, header, info, price_label, quantity_label, section, stock_change, success, summary_row,
    tea_added, tea_deleted, tea_details, tea_updated, type_label, warn,
};
pub use table::{TableBuilder, stats_table, tea_table};
pub use theme::{StockLevel, Theme, theme};
