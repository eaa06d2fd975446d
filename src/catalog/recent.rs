use crate::models::product::Product;

pub const MAX_RECENT_ITEMS: usize = 4;

/// Moves `id` to the front, dropping duplicates and anything past the cap.
pub fn push_recent(list: &[i64], id: i64) -> Vec<i64> {
    std::iter::once(id)
        .chain(list.iter().copied().filter(|&existing| existing != id))
        .take(MAX_RECENT_ITEMS)
        .collect()
}

/// Parses a comma separated id list, skipping anything that is not an integer.
pub fn parse_ids(raw: &str) -> Vec<i64> {
    let mut ids = Vec::with_capacity(MAX_RECENT_ITEMS);
    for id in raw.split(',').filter_map(|part| part.trim().parse::<i64>().ok()) {
        if ids.len() == MAX_RECENT_ITEMS {
            break;
        }
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids
}

/// Returns products in the order of `ids`, skipping ids with no product.
pub fn order_by_ids<'a>(products: &'a [Product], ids: &[i64]) -> Vec<&'a Product> {
    ids.iter()
        .filter_map(|id| products.iter().find(|p| p.id == *id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::product::fixtures::product;

    #[test]
    fn push_moves_to_front_and_caps() {
        let list = push_recent(&[], 1);
        assert_eq!(list, [1]);

        let list = push_recent(&[3, 2, 1], 2);
        assert_eq!(list, [2, 3, 1]);

        let list = push_recent(&[4, 3, 2, 1], 5);
        assert_eq!(list, [5, 4, 3, 2]);
    }

    #[test]
    fn parse_ids_skips_junk_and_duplicates() {
        assert_eq!(parse_ids("3, 1,abc,,3,7,9,11"), [3, 1, 7, 9]);
        assert!(parse_ids("").is_empty());
    }

    #[test]
    fn orders_by_ids() {
        let products = vec![product(1, "a"), product(2, "b"), product(3, "c")];
        let got: Vec<i64> = order_by_ids(&products, &[3, 99, 1]).iter().map(|p| p.id).collect();
        assert_eq!(got, [3, 1]);
    }
}
