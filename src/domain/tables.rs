//! Lookup tables the year-in-review engine reads: category icons and the
//! "fun comparison" price list. Defaults are built in; a TOML file can
//! override any section.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::Cents;

/// Icon for categories missing from the icon table.
pub const DEFAULT_ICON: &str = "📊";

/// One row of the comparison table: spend in `category` expressed as a
/// number of items costing `unit_price_cents` each.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunComparison {
    pub category: String,
    pub unit_price_cents: Cents,
    pub label: String,
}

impl FunComparison {
    pub fn new(category: &str, unit_price_cents: Cents, label: &str) -> Self {
        Self {
            category: category.to_string(),
            unit_price_cents,
            label: label.to_string(),
        }
    }
}

/// Comparison applied to total spending when no category row matched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackComparison {
    pub unit_price_cents: Cents,
    pub label: String,
}

impl Default for FallbackComparison {
    fn default() -> Self {
        Self {
            unit_price_cents: 25000,
            label: "cups of chai ☕".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WrappedTables {
    pub category_icons: HashMap<String, String>,
    pub default_icon: String,
    /// Emission order is table order.
    pub fun_comparisons: Vec<FunComparison>,
    pub fallback: FallbackComparison,
}

impl WrappedTables {
    pub fn icon_for(&self, category: &str) -> &str {
        self.category_icons
            .get(category)
            .map(String::as_str)
            .unwrap_or(self.default_icon.as_str())
    }

    /// Parse a tables file. Sections left out keep their defaults.
    pub fn from_toml_str(input: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(input)
    }
}

impl Default for WrappedTables {
    fn default() -> Self {
        let category_icons = [
            ("rent", "🏠"),
            ("food", "🍕"),
            ("transport", "🚗"),
            ("entertainment", "🎬"),
            ("misc", "📦"),
            ("savings", "💰"),
            ("shopping", "🛍️"),
            ("health", "💊"),
            ("utilities", "⚡"),
        ]
        .into_iter()
        .map(|(category, icon)| (category.to_string(), icon.to_string()))
        .collect();

        let fun_comparisons = vec![
            FunComparison::new("food", 25000, "cups of chai ☕"),
            FunComparison::new("food", 50000, "plates of biryani 🍛"),
            FunComparison::new("transport", 3000, "auto rides 🛺"),
            FunComparison::new("transport", 15000, "Uber rides 🚖"),
            FunComparison::new("entertainment", 20000, "movie tickets 🎬"),
            FunComparison::new("entertainment", 50000, "Netflix subscriptions 📺"),
            FunComparison::new("shopping", 100000, "new t-shirts 👕"),
            FunComparison::new("rent", 500000, "coworking day passes 💼"),
        ];

        Self {
            category_icons,
            default_icon: DEFAULT_ICON.to_string(),
            fun_comparisons,
            fallback: FallbackComparison::default(),
        }
    }
}
