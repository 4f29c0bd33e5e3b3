use crate::catalog::{Catalog, Product};

pub const PERSONA: &str = "You are a friendly skincare and beauty assistant for L'Oréal. Always reply in a natural, conversational way. Use line breaks or bullet points to make your answers easy to read.";

pub const EMPTY_SELECTION_ERROR: &str = "Please select at least one product to generate a routine.";

/// `1. Name (Brand)` lines, one per product.
pub fn numbered_list(products: &[Product]) -> String {
    products
        .iter()
        .enumerate()
        .map(|(index, product)| format!("{}. {}", index + 1, product.short_label()))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn routine_request(selected: &[Product]) -> String {
    format!(
        "Here are the products I've selected:\n{}\nCan you create a personalized skincare routine using these products?",
        numbered_list(selected)
    )
}

pub fn conversation_system_prompt(selected: &[Product], catalog: &Catalog) -> String {
    let selected_list = if selected.is_empty() {
        "(none)".to_string()
    } else {
        numbered_list(selected)
    };
    let product_details = catalog
        .products()
        .iter()
        .map(|product| format!("- {}: {}", product.short_label(), product.description))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "{PERSONA}\nHere are the products the user has selected:\n{selected_list}\nHere is information about all available products:\n{product_details}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{product, Category};

    #[test]
    fn routine_request_enumerates_selection() {
        let selected = vec![
            product(1, "Foaming Cleanser", "CeraVe", Category::Cleanser),
            product(2, "Daily Lotion", "CeraVe", Category::Moisturizer),
        ];
        assert_eq!(
            routine_request(&selected),
            "Here are the products I've selected:\n1. Foaming Cleanser (CeraVe)\n2. Daily Lotion (CeraVe)\nCan you create a personalized skincare routine using these products?"
        );
    }

    #[test]
    fn system_prompt_embeds_selection_and_catalog() {
        let cleanser = product(1, "Foaming Cleanser", "CeraVe", Category::Cleanser);
        let spf = product(3, "Sheer SPF", "La Roche-Posay", Category::Suncare);
        let catalog = Catalog::new(vec![cleanser.clone(), spf]).expect("catalog");

        let prompt = conversation_system_prompt(&[cleanser], &catalog);
        assert!(prompt.starts_with(PERSONA));
        assert!(prompt.contains("selected:\n1. Foaming Cleanser (CeraVe)\n"));
        assert!(prompt.ends_with(
            "- Foaming Cleanser (CeraVe): Foaming Cleanser by CeraVe\n- Sheer SPF (La Roche-Posay): Sheer SPF by La Roche-Posay"
        ));
    }

    #[test]
    fn system_prompt_marks_empty_selection() {
        let prompt = conversation_system_prompt(&[], &Catalog::default());
        assert!(prompt.contains("selected:\n(none)\nHere is information"));
    }
}
