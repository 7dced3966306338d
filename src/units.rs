use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown unit `{0}`")]
pub struct UnknownUnit(pub String);

/// Units a recipe ingredient may be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipeUnit {
    G,
    Ml,
    Szt,
    Tbs,
    Tsp,
}

impl RecipeUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            RecipeUnit::G => "g",
            RecipeUnit::Ml => "ml",
            RecipeUnit::Szt => "szt",
            RecipeUnit::Tbs => "tbs",
            RecipeUnit::Tsp => "tsp",
        }
    }

    /// Maps a recipe unit onto the shopping vocabulary. Spoon measures are
    /// bought as pieces.
    pub fn normalized(self) -> ShoppingUnit {
        match self {
            RecipeUnit::G => ShoppingUnit::G,
            RecipeUnit::Ml => ShoppingUnit::Ml,
            RecipeUnit::Szt | RecipeUnit::Tbs | RecipeUnit::Tsp => ShoppingUnit::Szt,
        }
    }
}

impl FromStr for RecipeUnit {
    type Err = UnknownUnit;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "g" => Ok(RecipeUnit::G),
            "ml" => Ok(RecipeUnit::Ml),
            "szt" => Ok(RecipeUnit::Szt),
            "tbs" => Ok(RecipeUnit::Tbs),
            "tsp" => Ok(RecipeUnit::Tsp),
            other => Err(UnknownUnit(other.to_string())),
        }
    }
}

impl fmt::Display for RecipeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Units a shopping list item may be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShoppingUnit {
    #[serde(rename = "g")]
    G,
    #[serde(rename = "kg")]
    Kg,
    #[serde(rename = "ml")]
    Ml,
    #[serde(rename = "L")]
    L,
    #[serde(rename = "szt")]
    Szt,
}

impl ShoppingUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            ShoppingUnit::G => "g",
            ShoppingUnit::Kg => "kg",
            ShoppingUnit::Ml => "ml",
            ShoppingUnit::L => "L",
            ShoppingUnit::Szt => "szt",
        }
    }
}

impl FromStr for ShoppingUnit {
    type Err = UnknownUnit;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "g" => Ok(ShoppingUnit::G),
            "kg" => Ok(ShoppingUnit::Kg),
            "ml" => Ok(ShoppingUnit::Ml),
            "L" => Ok(ShoppingUnit::L),
            "szt" => Ok(ShoppingUnit::Szt),
            other => Err(UnknownUnit(other.to_string())),
        }
    }
}

impl fmt::Display for ShoppingUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
