use std::collections::HashSet;

use serde::Serialize;

use crate::models::product::Product;

pub const MIN_QUERY_CHARS: usize = 2;
pub const MAX_SUGGESTIONS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Product,
    Brand,
    Category,
    Ingredient,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    pub text: String,
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<i64>,
}

/// Suggestions for `query` over `products`, deduplicated by text and kind.
pub fn suggest(products: &[Product], query: &str) -> Vec<Suggestion> {
    if query.chars().count() < MIN_QUERY_CHARS {
        return Vec::new();
    }
    let needle = query.to_lowercase();

    let mut seen: HashSet<(String, SuggestionKind)> = HashSet::new();
    let mut suggestions = Vec::new();
    let mut push = |text: &str, kind: SuggestionKind, product_id: Option<i64>| {
        if text.to_lowercase().contains(&needle) && seen.insert((text.to_string(), kind)) {
            suggestions.push(Suggestion { text: text.to_string(), kind, product_id });
        }
    };

    for product in products {
        push(&product.name, SuggestionKind::Product, Some(product.id));
        if let Some(brand) = product.brand.as_deref() {
            push(brand, SuggestionKind::Brand, None);
        }
        if let Some(category) = product.category.as_deref() {
            push(category, SuggestionKind::Category, None);
        }
        for ingredient in product.ingredient_list() {
            push(ingredient, SuggestionKind::Ingredient, None);
        }
    }

    suggestions.sort_by(|a, b| {
        a.text
            .to_lowercase()
            .cmp(&b.text.to_lowercase())
            .then_with(|| a.text.cmp(&b.text))
    });
    suggestions.truncate(MAX_SUGGESTIONS);
    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::product::fixtures::product;

    fn catalog() -> Vec<Product> {
        let mut butter = product(110, "Amul Butter");
        butter.brand = Some("Amul".into());
        butter.category = Some("Dairy".into());
        butter.ingredients = Some("Milk Fat, Salt".into());

        let mut milk = product(102, "Amul Pure Milk");
        milk.brand = Some("Amul".into());
        milk.category = Some("Dairy".into());
        milk.ingredients = Some("Milk, Vitamin A".into());

        vec![butter, milk]
    }

    #[test]
    fn short_queries_return_nothing() {
        assert!(suggest(&catalog(), "a").is_empty());
        assert!(suggest(&catalog(), "").is_empty());
    }

    #[test]
    fn query_length_counts_whitespace() {
        // Two characters is long enough, even when one is a space
        let got = suggest(&catalog(), "l ");
        let texts: Vec<_> = got.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, ["Amul Butter", "Amul Pure Milk"]);
    }

    #[test]
    fn serializes_kind_as_type() {
        let suggestion = Suggestion { text: "Amul".into(), kind: SuggestionKind::Brand, product_id: None };
        assert_eq!(
            serde_json::to_value(&suggestion).unwrap(),
            serde_json::json!({ "text": "Amul", "type": "brand" })
        );
    }

    #[test]
    fn deduplicates_and_sorts() {
        let got = suggest(&catalog(), "amul");
        let texts: Vec<_> = got.iter().map(|s| (s.text.as_str(), s.kind)).collect();
        assert_eq!(
            texts,
            [
                ("Amul", SuggestionKind::Brand),
                ("Amul Butter", SuggestionKind::Product),
                ("Amul Pure Milk", SuggestionKind::Product),
            ]
        );
        assert_eq!(got[1].product_id, Some(110));
        assert_eq!(got[0].product_id, None);
    }

    #[test]
    fn matches_ingredients_case_insensitively() {
        let got = suggest(&catalog(), "MILK");
        let texts: Vec<_> = got.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, ["Amul Pure Milk", "Milk", "Milk Fat"]);
    }

    #[test]
    fn caps_at_ten() {
        let products: Vec<Product> = (0..25).map(|i| product(i, &format!("Snack {i:02}"))).collect();
        let got = suggest(&products, "snack");
        assert_eq!(got.len(), MAX_SUGGESTIONS);
        assert_eq!(got[0].text, "Snack 00");
    }
}
