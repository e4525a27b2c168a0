//! Domain types representing spending categories and their styling palette.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

/// User-defined spending bucket with a monthly budget.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub monthly_budget: f64,
    #[serde(default)]
    pub icon: CategoryIcon,
    #[serde(default)]
    pub color: PaletteColor,
    pub owner_id: OwnerId,
    pub created_at: DateTime<Utc>,
}

impl Category {
    pub fn new(owner_id: OwnerId, name: impl Into<String>, monthly_budget: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into().trim().to_string(),
            monthly_budget,
            icon: CategoryIcon::default(),
            color: PaletteColor::default(),
            owner_id,
            created_at: Utc::now(),
        }
    }

    pub fn with_style(mut self, icon: CategoryIcon, color: PaletteColor) -> Self {
        self.icon = icon;
        self.color = color;
        self
    }

    pub fn style(&self) -> CategoryStyle {
        CategoryStyle {
            icon: self.icon,
            color: self.color,
        }
    }
}

impl Identifiable for Category {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for Category {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Owned for Category {
    fn owner_id(&self) -> &OwnerId {
        &self.owner_id
    }
}

impl Displayable for Category {
    fn display_label(&self) -> String {
        format!("{} [{}]", self.name, self.icon)
    }
}

/// Icon and colour used to render a category or an expense row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStyle {
    pub icon: CategoryIcon,
    pub color: PaletteColor,
}

impl CategoryStyle {
    /// Styling of the synthetic "Other" category.
    pub const fn other() -> Self {
        Self {
            icon: CategoryIcon::Folder,
            color: PaletteColor::Gray,
        }
    }
}

impl Default for CategoryStyle {
    fn default() -> Self {
        Self::other()
    }
}

/// Symbolic icon identifiers offered when creating a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CategoryIcon {
    #[default]
    AttachMoney,
    Home,
    DirectionsCar,
    Restaurant,
    ShoppingBag,
    SportsEsports,
    PhoneAndroid,
    FlashOn,
    LocalHospital,
    School,
    Movie,
    ShoppingCart,
    Work,
    Train,
    FitnessCenter,
    Pets,
    LocalGasStation,
    Wifi,
    MusicNote,
    Cake,
    /// Reserved for uncategorized expenses.
    Folder,
}

impl CategoryIcon {
    /// Icons a user may pick; `Folder` is reserved.
    pub const SELECTABLE: [CategoryIcon; 20] = [
        CategoryIcon::AttachMoney,
        CategoryIcon::Home,
        CategoryIcon::DirectionsCar,
        CategoryIcon::Restaurant,
        CategoryIcon::ShoppingBag,
        CategoryIcon::SportsEsports,
        CategoryIcon::PhoneAndroid,
        CategoryIcon::FlashOn,
        CategoryIcon::LocalHospital,
        CategoryIcon::School,
        CategoryIcon::Movie,
        CategoryIcon::ShoppingCart,
        CategoryIcon::Work,
        CategoryIcon::Train,
        CategoryIcon::FitnessCenter,
        CategoryIcon::Pets,
        CategoryIcon::LocalGasStation,
        CategoryIcon::Wifi,
        CategoryIcon::MusicNote,
        CategoryIcon::Cake,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CategoryIcon::AttachMoney => "attach-money",
            CategoryIcon::Home => "home",
            CategoryIcon::DirectionsCar => "directions-car",
            CategoryIcon::Restaurant => "restaurant",
            CategoryIcon::ShoppingBag => "shopping-bag",
            CategoryIcon::SportsEsports => "sports-esports",
            CategoryIcon::PhoneAndroid => "phone-android",
            CategoryIcon::FlashOn => "flash-on",
            CategoryIcon::LocalHospital => "local-hospital",
            CategoryIcon::School => "school",
            CategoryIcon::Movie => "movie",
            CategoryIcon::ShoppingCart => "shopping-cart",
            CategoryIcon::Work => "work",
            CategoryIcon::Train => "train",
            CategoryIcon::FitnessCenter => "fitness-center",
            CategoryIcon::Pets => "pets",
            CategoryIcon::LocalGasStation => "local-gas-station",
            CategoryIcon::Wifi => "wifi",
            CategoryIcon::MusicNote => "music-note",
            CategoryIcon::Cake => "cake",
            CategoryIcon::Folder => "folder",
        }
    }

    /// Looks up a selectable icon by its symbolic name.
    pub fn from_name(name: &str) -> Option<Self> {
        let needle = name.trim().to_ascii_lowercase().replace('_', "-");
        Self::SELECTABLE
            .into_iter()
            .find(|icon| icon.as_str() == needle)
    }
}

impl fmt::Display for CategoryIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed colour palette for categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PaletteColor {
    #[default]
    #[serde(rename = "#4D8FAC")]
    SteelBlue,
    #[serde(rename = "#E74C3C")]
    Red,
    #[serde(rename = "#27AE60")]
    Green,
    #[serde(rename = "#F39C12")]
    Orange,
    #[serde(rename = "#9B59B6")]
    Purple,
    #[serde(rename = "#E67E22")]
    Carrot,
    #[serde(rename = "#1ABC9C")]
    Turquoise,
    #[serde(rename = "#34495E")]
    Slate,
    /// Reserved for uncategorized expenses.
    #[serde(rename = "#666666")]
    Gray,
}

impl PaletteColor {
    pub const SELECTABLE: [PaletteColor; 8] = [
        PaletteColor::SteelBlue,
        PaletteColor::Red,
        PaletteColor::Green,
        PaletteColor::Orange,
        PaletteColor::Purple,
        PaletteColor::Carrot,
        PaletteColor::Turquoise,
        PaletteColor::Slate,
    ];

    pub fn hex(self) -> &'static str {
        match self {
            PaletteColor::SteelBlue => "#4D8FAC",
            PaletteColor::Red => "#E74C3C",
            PaletteColor::Green => "#27AE60",
            PaletteColor::Orange => "#F39C12",
            PaletteColor::Purple => "#9B59B6",
            PaletteColor::Carrot => "#E67E22",
            PaletteColor::Turquoise => "#1ABC9C",
            PaletteColor::Slate => "#34495E",
            PaletteColor::Gray => "#666666",
        }
    }

    /// Looks up a selectable colour by hex code, case-insensitively.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let trimmed = hex.trim();
        let needle = if trimmed.starts_with('#') {
            trimmed.to_ascii_uppercase()
        } else {
            format!("#{}", trimmed.to_ascii_uppercase())
        };
        Self::SELECTABLE
            .into_iter()
            .find(|color| color.hex() == needle)
    }
}

impl fmt::Display for PaletteColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.hex())
    }
}
