//! Intention and emotion lists: append and remove-by-id.

use crate::types::ListItem;

/// Fresh process-unique item id.
pub fn new_item_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Append `text` (trimmed) to `items`.
///
/// Blank input is ignored. Returns the new item's id when something was added.
pub fn add_item(items: &mut Vec<ListItem>, text: &str) -> Option<String> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    let id = new_item_id();
    items.push(ListItem {
        id: id.clone(),
        text: text.to_string(),
    });
    Some(id)
}

/// Remove the item with `id`. Returns whether an item was removed.
pub fn remove_item(items: &mut Vec<ListItem>, id: &str) -> bool {
    let before = items.len();
    items.retain(|item| item.id != id);
    items.len() != before
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_add_trims_and_appends() {
        let mut items = Vec::new();
        add_item(&mut items, "first").unwrap();
        let id = add_item(&mut items, "  Love what I do \n").unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[1].text, "Love what I do");
        assert_eq!(items[1].id, id);
        assert_eq!(items[0].text, "first");
    }

    #[test]
    fn test_add_blank_is_noop() {
        let mut items = Vec::new();
        assert_eq!(add_item(&mut items, ""), None);
        assert_eq!(add_item(&mut items, "   "), None);
        assert!(items.is_empty());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut items = Vec::new();
        let id = add_item(&mut items, "Free").unwrap();
        add_item(&mut items, "Grateful").unwrap();

        assert!(remove_item(&mut items, &id));
        assert!(!remove_item(&mut items, &id));
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].text, "Grateful");
    }

    #[test]
    fn test_ids_not_reused_across_add_remove_cycles() {
        let mut items = Vec::new();
        let mut seen = HashSet::new();
        for _ in 0..200 {
            let id = add_item(&mut items, "same text").unwrap();
            assert!(seen.insert(id.clone()), "id reused: {id}");
            remove_item(&mut items, &id);
        }
        assert!(items.is_empty());
    }
}
