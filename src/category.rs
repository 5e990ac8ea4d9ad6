//! The fixed set of categories a transaction can be filed under.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

/// A label used to group transactions, e.g. "Food" or "Salary".
///
/// New transactions must use one of these categories. Stored transactions
/// keep their category as text, see [crate::transaction::Transaction].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Groceries, eating out.
    Food,
    /// Wages and other regular income.
    Salary,
    /// Public transport, fuel, parking.
    Transport,
    /// Rent, utilities, subscriptions.
    Bills,
    /// Clothes, gadgets, household items.
    Shopping,
    /// Movies, games, concerts.
    Entertainment,
    /// Doctor, pharmacy, gym.
    Health,
    /// Anything that does not fit the other categories.
    Other,
}

impl Category {
    /// Every category in the order it is offered to the user.
    pub const ALL: [Category; 8] = [
        Category::Food,
        Category::Salary,
        Category::Transport,
        Category::Bills,
        Category::Shopping,
        Category::Entertainment,
        Category::Health,
        Category::Other,
    ];

    /// The label stored in the database and shown to the user.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Salary => "Salary",
            Category::Transport => "Transport",
            Category::Bills => "Bills",
            Category::Shopping => "Shopping",
            Category::Entertainment => "Entertainment",
            Category::Health => "Health",
            Category::Other => "Other",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    /// Parse a category label, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();

        Category::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(label))
            .ok_or_else(|| Error::InvalidCategory(label.to_owned()))
    }
}
