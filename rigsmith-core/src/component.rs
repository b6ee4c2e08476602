use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use serde_with::{
    serde_as, DefaultOnError, DeserializeFromStr, DisplayFromStr, PickFirst, SerializeDisplay,
};
use std::{fmt::Display, str::FromStr};

use crate::common::{IgnoreComma, PriceText};

/// A component slot in a build.
///
/// The declaration order is the canonical order of every per-category map in this
/// workspace, so it doubles as the order components are listed in results.
#[derive(
    SerializeDisplay, DeserializeFromStr, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub enum Category {
    Cpu,
    Gpu,
    Ram,
    Storage,
    Motherboard,
    Psu,
    Case,
    Cooler,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Self::Cpu,
        Self::Gpu,
        Self::Ram,
        Self::Storage,
        Self::Motherboard,
        Self::Psu,
        Self::Case,
        Self::Cooler,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cpu => "cpu",
            Self::Gpu => "gpu",
            Self::Ram => "ram",
            Self::Storage => "storage",
            Self::Motherboard => "motherboard",
            Self::Psu => "psu",
            Self::Case => "case",
            Self::Cooler => "cooler",
        }
    }

    /// Case-insensitive lookup. Separators are ignored, so `"Power Supply"` and
    /// `"power_supply"` both resolve to [`Category::Psu`].
    pub fn from_name<S: AsRef<str>>(s: S) -> Option<Self> {
        match s
            .as_ref()
            .chars()
            .flat_map(char::to_lowercase)
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .as_str()
        {
            "cpu" | "processor" => Some(Self::Cpu),
            "gpu" | "graphicscard" | "videocard" => Some(Self::Gpu),
            "ram" | "memory" => Some(Self::Ram),
            "storage" | "drive" => Some(Self::Storage),
            "motherboard" | "mainboard" => Some(Self::Motherboard),
            "psu" | "powersupply" => Some(Self::Psu),
            "case" | "chassis" => Some(Self::Case),
            "cooler" | "cpucooler" => Some(Self::Cooler),
            _ => None,
        }
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| anyhow!("unknown component category `{}`", s))
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single named attribute of a component, such as `socket = AM4`.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Specification {
    pub name: String,
    pub value: String,
}

#[serde_as]
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Component {
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub id: u32,
    pub name: String,
    #[serde(alias = "type")]
    pub category: Category,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub model: String,
    #[serde_as(as = "PickFirst<(_, PriceText)>")]
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    #[serde_as(as = "DefaultOnError<PickFirst<(_, Option<IgnoreComma<f64>>)>>")]
    pub performance_score: Option<f64>,
    /// Watts.
    #[serde(default)]
    #[serde_as(as = "DefaultOnError<PickFirst<(_, Option<IgnoreComma<u32>>)>>")]
    pub power_consumption: Option<u32>,
    #[serde(default)]
    pub specifications: Vec<Specification>,
}

impl Component {
    pub fn new<S: Into<String>>(id: u32, name: S, category: Category, price: f64) -> Self {
        Self {
            id,
            name: name.into(),
            category,
            brand: String::new(),
            model: String::new(),
            price,
            description: None,
            performance_score: None,
            power_consumption: None,
            specifications: Vec::new(),
        }
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.performance_score = Some(score);
        self
    }

    pub fn with_power(mut self, watts: u32) -> Self {
        self.power_consumption = Some(watts);
        self
    }

    pub fn with_spec<N: Into<String>, V: Into<String>>(mut self, name: N, value: V) -> Self {
        self.specifications.push(Specification {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Value of the first specification whose name matches `name`, ignoring case.
    pub fn spec(&self, name: &str) -> Option<&str> {
        self.specifications
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
            .map(|s| s.value.as_str())
    }

    pub fn matches_text(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        [&self.name, &self.brand, &self.model]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

#[cfg(test)]
mod tests {
    use super::{Category, Component};
    use crate::common::roughly_equal;

    #[test]
    fn test_category_names() {
        assert_eq!("CPU".parse::<Category>().unwrap(), Category::Cpu);
        assert_eq!("Motherboard".parse::<Category>().unwrap(), Category::Motherboard);
        assert_eq!("power_supply".parse::<Category>().unwrap(), Category::Psu);
        assert_eq!(Category::from_name("Graphics Card"), Some(Category::Gpu));
        assert!("toaster".parse::<Category>().is_err());
        assert_eq!(Category::Storage.to_string(), "storage");
    }

    #[test]
    fn test_category_order() {
        let mut shuffled = vec![Category::Psu, Category::Cpu, Category::Ram, Category::Gpu];
        shuffled.sort();
        assert_eq!(
            shuffled,
            vec![Category::Cpu, Category::Gpu, Category::Ram, Category::Psu]
        );
    }

    #[test]
    fn test_spec_lookup_ignores_case() {
        let cpu = Component::new(1, "Ryzen 5 5600X", Category::Cpu, 199.0).with_spec("Socket", "AM4");
        assert_eq!(cpu.spec("socket"), Some("AM4"));
        assert_eq!(cpu.spec("SOCKET"), Some("AM4"));
        assert_eq!(cpu.spec("tdp"), None);
    }

    #[test]
    fn test_deserialize_loose_fields() {
        let component: Component = serde_json::from_str(
            r#"{
                "id": "17",
                "name": "Big GPU",
                "type": "GPU",
                "price": "$1,299.99",
                "performance_score": "1,200",
                "power_consumption": "lots",
                "specifications": [{ "name": "memory", "value": "16GB" }]
            }"#,
        )
        .unwrap();

        assert_eq!(component.id, 17);
        assert_eq!(component.category, Category::Gpu);
        assert!(roughly_equal(component.price, 1299.99));
        assert_eq!(component.performance_score, Some(1200.0));
        assert_eq!(component.power_consumption, None);
        assert_eq!(component.spec("Memory"), Some("16GB"));
        assert!(component.brand.is_empty());
    }

    #[test]
    fn test_deserialize_plain_numbers() {
        let component: Component = serde_json::from_str(
            r#"{ "id": 3, "name": "PSU", "category": "psu", "price": 89.5, "power_consumption": 0 }"#,
        )
        .unwrap();
        assert_eq!(component.category, Category::Psu);
        assert_eq!(component.price, 89.5);
        assert_eq!(component.performance_score, None);
        assert_eq!(component.power_consumption, Some(0));
    }

    #[test]
    fn test_matches_text() {
        let mut gpu = Component::new(2, "GeForce RTX 4070", Category::Gpu, 599.0);
        gpu.brand = "NVIDIA".to_string();
        assert!(gpu.matches_text("rtx"));
        assert!(gpu.matches_text("nvidia"));
        assert!(!gpu.matches_text("radeon"));
    }
}
