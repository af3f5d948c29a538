use crate::contract::TeaType;
use owo_colors::Style;
use std::sync::OnceLock;

static THEME: OnceLock<Theme> = OnceLock::new();

/// How a tea's stock compares to the low-stock threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockLevel {
    Out,
    Low,
    InStock,
}

impl StockLevel {
    pub fn of(quantity: i64, low_stock: i64) -> Self {
        if quantity <= 0 {
            StockLevel::Out
        } else if quantity < low_stock {
            StockLevel::Low
        } else {
            StockLevel::InStock
        }
    }
}

#[derive(Debug, Clone)]
pub struct Theme {
    pub header: Style,
    pub success: Style,
    pub error: Style,
    pub warn: Style,
    pub info: Style,
    pub dim: Style,
    pub price: Style,
    pub out_of_stock: Style,
    pub low_stock: Style,
    pub black_tea: Style,
    pub green_tea: Style,
    pub herbal_tea: Style,
}

impl Theme {
    pub fn detect() -> Self {
        if crate::output::is_quiet() || !console::Term::stdout().is_term() {
            return Self::plain();
        }
        Self::colored()
    }

    pub fn colored() -> Self {
        Self {
            header: Style::new().green().bold(),
            success: Style::new().green().bold(),
            error: Style::new().red().bold(),
            warn: Style::new().yellow().bold(),
            info: Style::new().cyan(),
            dim: Style::new().white().dimmed(),
            price: Style::new().bright_white(),
            out_of_stock: Style::new().red().bold(),
            low_stock: Style::new().yellow(),
            black_tea: Style::new().red(),
            green_tea: Style::new().green(),
            herbal_tea: Style::new().magenta(),
        }
    }

    pub fn plain() -> Self {
        Self {
            header: Style::new(),
            success: Style::new(),
            error: Style::new(),
            warn: Style::new(),
            info: Style::new(),
            dim: Style::new(),
            price: Style::new(),
            out_of_stock: Style::new(),
            low_stock: Style::new(),
            black_tea: Style::new(),
            green_tea: Style::new(),
            herbal_tea: Style::new(),
        }
    }

    pub fn tea_type(&self, tea_type: TeaType) -> Style {
        match tea_type {
            TeaType::Black => self.black_tea,
            TeaType::Green => self.green_tea,
            TeaType::Herbal => self.herbal_tea,
        }
    }

    /// Style for a stock level; healthy stock is left unstyled.
    pub fn stock(&self, level: StockLevel) -> Option<Style> {
        match level {
            StockLevel::Out => Some(self.out_of_stock),
            StockLevel::Low => Some(self.low_stock),
            StockLevel::InStock => None,
        }
    }
}

pub fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::detect)
}
