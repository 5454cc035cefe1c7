//! Category display formatting

use crate::models::Category;

/// Format categories as an id/name table
pub fn format_category_list(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories found.\n\nRun 'budgetwise init' to create default categories.\n"
            .to_string();
    }

    let mut output = String::new();
    output.push_str(&format!("{:<8} {}\n", "ID", "Name"));
    output.push_str(&"-".repeat(30));
    output.push('\n');

    for category in categories {
        output.push_str(&format!("{:<8} {}\n", category.id.to_string(), category.name));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CategoryId;

    #[test]
    fn test_format_category_list() {
        let categories = vec![
            Category::new(CategoryId::new(1), "Food"),
            Category::new(CategoryId::new(12), "Transport"),
        ];

        let output = format_category_list(&categories);
        assert!(output.contains("cat-1    Food"));
        assert!(output.contains("cat-12   Transport"));
    }

    #[test]
    fn test_empty_list_hints_init() {
        assert!(format_category_list(&[]).contains("budgetwise init"));
    }
}
