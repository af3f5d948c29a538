use crate::tea::Tea;
use crate::ui::output::{price_label, quantity_label, type_label};
use tabled::{Table, Tabled, settings::Style};

#[derive(Tabled)]
pub struct TeaTableRow {
    #[tabled(rename = "ID")]
    pub id: i64,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Type")]
    pub tea_type: String,
    #[tabled(rename = "Price")]
    pub price: String,
    #[tabled(rename = "Quantity")]
    pub quantity: String,
    #[tabled(rename = "Image")]
    pub image: String,
}

impl TeaTableRow {
    fn from_tea(tea: &Tea, low_stock: i64) -> Self {
        Self {
            id: tea.id,
            name: tea.name.clone(),
            tea_type: type_label(tea.tea_type),
            price: price_label(tea.price),
            quantity: quantity_label(tea.quantity, low_stock),
            image: tea.image.clone().unwrap_or_else(|| "-".to_string()),
        }
    }
}

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

#[derive(Default)]
pub struct TableBuilder {
    rows: Vec<TableRow>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_row(&mut self, label: &str, value: &str) {
        self.rows.push(TableRow {
            metric: label.to_string(),
            value: value.to_string(),
        });
    }

    pub fn build(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }
        Table::new(&self.rows).with(Style::rounded()).to_string()
    }
}

pub fn stats_table(stats: &[(&str, String)]) -> String {
    let mut builder = TableBuilder::new();
    for (label, value) in stats {
        builder.add_row(label, value);
    }
    builder.build()
}

/// One row per tea; quantities under `low_stock` are highlighted.
pub fn tea_table(teas: &[Tea], low_stock: i64) -> String {
    if teas.is_empty() {
        return String::new();
    }
    let rows: Vec<TeaTableRow> = teas.iter().map(|t| TeaTableRow::from_tea(t, low_stock)).collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::TeaType;

    fn assam() -> Tea {
        Tea {
            id: 1,
            name: "Assam".to_string(),
            tea_type: TeaType::Black,
            price: 4.5,
            quantity: 12,
            image: None,
        }
    }

    #[test]
    fn test_tea_table_has_headers_and_rows() {
        let table = tea_table(&[assam()], 0);
        assert!(table.contains("Name"));
        assert!(table.contains("Quantity"));
        assert!(table.contains("Assam"));
        assert!(table.contains("4.50"));
        assert!(table.contains("Black"));
    }

    #[test]
    fn test_empty_tables_render_nothing() {
        assert!(tea_table(&[], 5).is_empty());
        assert!(stats_table(&[]).is_empty());
    }

    #[test]
    fn test_stats_table() {
        let table = stats_table(&[("Teas", "3".to_string())]);
        assert!(table.contains("Metric"));
        assert!(table.contains("Teas"));
    }
}
