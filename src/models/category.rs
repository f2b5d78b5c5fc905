// ============================================================================
// Enum : Category
// ============================================================================
// Catégorie d'une dépense (alimentation, transport, etc.)
//
// CONCEPTS RUST :
// 1. Enum avec un variant porteur de données : Unrecognized(String)
// 2. #[serde(from, into)] : sérialisation via une conversion String
// 3. Méthodes de cycle (next/previous) comme pour un sélecteur
// ============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};

/// Catégorie d'une dépense
///
/// L'ensemble connu est fermé ; un tag inconnu (données stockées à la main,
/// ancienne version...) est conservé tel quel dans `Unrecognized` et affiché
/// avec une icône et un libellé génériques.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    #[default]
    Food,
    Transport,
    Shopping,
    Entertainment,
    Bills,
    Health,
    Other,
    Unrecognized(String),
}

impl Category {
    /// Catégories proposées dans le formulaire, dans l'ordre d'affichage
    pub const KNOWN: [Category; 7] = [
        Category::Food,
        Category::Transport,
        Category::Shopping,
        Category::Entertainment,
        Category::Bills,
        Category::Health,
        Category::Other,
    ];

    /// Tag persistant (ex: "food")
    pub fn tag(&self) -> &str {
        match self {
            Category::Food => "food",
            Category::Transport => "transport",
            Category::Shopping => "shopping",
            Category::Entertainment => "entertainment",
            Category::Bills => "bills",
            Category::Health => "health",
            Category::Other => "other",
            Category::Unrecognized(tag) => tag,
        }
    }

    /// Libellé lisible (ex: "Food & Dining")
    ///
    /// Un tag inconnu est affiché brut plutôt que de faire échouer le rendu.
    pub fn label(&self) -> &str {
        match self {
            Category::Food => "Food & Dining",
            Category::Transport => "Transport",
            Category::Shopping => "Shopping",
            Category::Entertainment => "Entertainment",
            Category::Bills => "Bills & Utilities",
            Category::Health => "Health & Wellness",
            Category::Other => "Other",
            Category::Unrecognized(tag) => tag,
        }
    }

    /// Icône de la catégorie
    pub fn icon(&self) -> &'static str {
        match self {
            Category::Food => "🍕",
            Category::Transport => "🚗",
            Category::Shopping => "🛍️",
            Category::Entertainment => "🎬",
            Category::Bills => "💡",
            Category::Health => "🏥",
            Category::Other | Category::Unrecognized(_) => "📦",
        }
    }

    /// Vérifie si la catégorie fait partie de l'ensemble connu
    pub fn is_known(&self) -> bool {
        !matches!(self, Category::Unrecognized(_))
    }

    /// Catégorie suivante dans le sélecteur (cycle)
    ///
    /// Un tag inconnu revient sur la première catégorie connue.
    pub fn next(&self) -> Category {
        match Self::KNOWN.iter().position(|c| c == self) {
            Some(i) => Self::KNOWN[(i + 1) % Self::KNOWN.len()].clone(),
            None => Category::default(),
        }
    }

    /// Catégorie précédente dans le sélecteur (cycle inverse)
    pub fn previous(&self) -> Category {
        match Self::KNOWN.iter().position(|c| c == self) {
            Some(i) => Self::KNOWN[(i + Self::KNOWN.len() - 1) % Self::KNOWN.len()].clone(),
            None => Category::default(),
        }
    }
}

impl From<&str> for Category {
    fn from(tag: &str) -> Self {
        match tag {
            "food" => Category::Food,
            "transport" => Category::Transport,
            "shopping" => Category::Shopping,
            "entertainment" => Category::Entertainment,
            "bills" => Category::Bills,
            "health" => Category::Health,
            "other" => Category::Other,
            unknown => Category::Unrecognized(unknown.to_string()),
        }
    }
}

impl From<String> for Category {
    fn from(tag: String) -> Self {
        Category::from(tag.as_str())
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        match category {
            Category::Unrecognized(tag) => tag,
            known => known.tag().to_string(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.icon(), self.label())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_roundtrip_for_known_categories() {
        for category in Category::KNOWN {
            assert_eq!(Category::from(category.tag()), category);
            assert!(category.is_known());
        }
    }

    #[test]
    fn test_unrecognized_category_falls_back() {
        let category = Category::from("groceries");
        assert_eq!(category, Category::Unrecognized("groceries".to_string()));
        assert!(!category.is_known());
        assert_eq!(category.icon(), "📦");
        assert_eq!(category.label(), "groceries");
        assert_eq!(category.tag(), "groceries");
    }

    #[test]
    fn test_serde_uses_plain_tag() {
        let json = serde_json::to_string(&Category::Bills).unwrap();
        assert_eq!(json, "\"bills\"");

        let parsed: Category = serde_json::from_str("\"crypto\"").unwrap();
        assert_eq!(parsed, Category::Unrecognized("crypto".to_string()));
    }

    #[test]
    fn test_cycle() {
        assert_eq!(Category::Food.next(), Category::Transport);
        assert_eq!(Category::Other.next(), Category::Food);
        assert_eq!(Category::Food.previous(), Category::Other);
        assert_eq!(Category::from("weird").next(), Category::Food);
    }

    #[test]
    fn test_display() {
        assert_eq!(Category::Transport.to_string(), "🚗 Transport");
    }
}
