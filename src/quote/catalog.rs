//! Priced options offered by the wizard
//!
//! The catalog ships with built-in defaults and can be replaced through the
//! `[catalog]` section of the configuration.

use serde::{Deserialize, Serialize};

use super::selection::{AddOn, Surface};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnclosureOption {
    pub name: String,
    /// Price per square meter of surface
    pub base_price: f64,
    /// French-style glazing (floor-to-ceiling, no walls finish)
    #[serde(default)]
    pub french: bool,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialOption {
    pub name: String,
    /// Added to the base price per square meter
    pub coefficient: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddOnOption {
    pub name: String,
    pub price: f64,
}

impl AddOnOption {
    pub fn to_add_on(&self) -> AddOn {
        AddOn::new(self.name.clone(), self.price)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub enclosure_types: Vec<EnclosureOption>,
    #[serde(default)]
    pub walls: Vec<MaterialOption>,
    #[serde(default)]
    pub ceiling: Vec<MaterialOption>,
    #[serde(default)]
    pub floor: Vec<MaterialOption>,
    #[serde(default)]
    pub add_ons: Vec<AddOnOption>,
}

impl Catalog {
    pub fn materials(&self, surface: Surface) -> &[MaterialOption] {
        match surface {
            Surface::Walls => &self.walls,
            Surface::Ceiling => &self.ceiling,
            Surface::Floor => &self.floor,
        }
    }

    /// Case-insensitive lookup used by the headless `quote` command
    pub fn find_enclosure(&self, name: &str) -> Option<&EnclosureOption> {
        self.enclosure_types
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(name.trim()))
    }

    pub fn find_material(&self, surface: Surface, name: &str) -> Option<&MaterialOption> {
        self.materials(surface)
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case(name.trim()))
    }

    pub fn find_add_on(&self, name: &str) -> Option<&AddOnOption> {
        self.add_ons
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name.trim()))
    }
}

fn material(name: &str, coefficient: f64) -> MaterialOption {
    MaterialOption {
        name: name.to_string(),
        coefficient,
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            enclosure_types: vec![
                EnclosureOption {
                    name: "Cold glazing".to_string(),
                    base_price: 2800.0,
                    french: false,
                    description: "Aluminium frames, single glass, seasonal use".to_string(),
                },
                EnclosureOption {
                    name: "Warm glazing".to_string(),
                    base_price: 4500.0,
                    french: false,
                    description: "PVC frames with insulated glass units".to_string(),
                },
                EnclosureOption {
                    name: "French glazing".to_string(),
                    base_price: 5600.0,
                    french: true,
                    description: "Floor-to-ceiling glass, no parapet walls".to_string(),
                },
            ],
            walls: vec![
                material("PVC panels", 900.0),
                material("Wood lining", 1400.0),
                material("Plaster and paint", 1100.0),
            ],
            ceiling: vec![
                material("PVC panels", 800.0),
                material("Stretch ceiling", 1200.0),
                material("Wood lining", 1300.0),
            ],
            floor: vec![
                material("Laminate", 1000.0),
                material("Ceramic tiles", 1500.0),
                material("Wood decking", 1700.0),
            ],
            add_ons: vec![
                AddOnOption {
                    name: "Insulation".to_string(),
                    price: 15000.0,
                },
                AddOnOption {
                    name: "Electrical wiring".to_string(),
                    price: 8000.0,
                },
                AddOnOption {
                    name: "Window sill".to_string(),
                    price: 3500.0,
                },
                AddOnOption {
                    name: "Built-in cabinet".to_string(),
                    price: 25000.0,
                },
            ],
        }
    }
}
