//! Naming-convention transforms.
//!
//! Case conversion is delegated to `heck`; pluralisation is a small English
//! rule set applied to the last word of an identifier, which is all the
//! scaffolder needs for table and route names.

use heck::{ToKebabCase, ToLowerCamelCase, ToPascalCase, ToSnakeCase};

/// Words whose plural form is not rule-based. Keys are lowercase.
const IRREGULAR: &[(&str, &str)] = &[
    ("person", "people"),
    ("man", "men"),
    ("woman", "women"),
    ("child", "children"),
    ("tooth", "teeth"),
    ("foot", "feet"),
    ("mouse", "mice"),
    ("goose", "geese"),
    ("ox", "oxen"),
    ("leaf", "leaves"),
    ("life", "lives"),
    ("knife", "knives"),
    ("wife", "wives"),
    ("half", "halves"),
    ("criterion", "criteria"),
    ("datum", "data"),
    ("medium", "media"),
    ("analysis", "analyses"),
    ("status", "statuses"),
];

/// Words with identical singular and plural forms.
const UNCOUNTABLE: &[&str] = &[
    "equipment",
    "information",
    "rice",
    "money",
    "species",
    "series",
    "fish",
    "sheep",
    "deer",
    "news",
    "feedback",
    "metadata",
    "software",
    "hardware",
    "audio",
    "data",
];

pub fn pascal(s: &str) -> String {
    s.to_pascal_case()
}

pub fn camel(s: &str) -> String {
    s.to_lower_camel_case()
}

pub fn kebab(s: &str) -> String {
    s.to_kebab_case()
}

pub fn snake(s: &str) -> String {
    s.to_snake_case()
}

/// Pluralise the last word of a PascalCase or camelCase identifier.
///
/// | Input         | Output          |
/// |---------------|-----------------|
/// | `Invoice`     | `Invoices`      |
/// | `Category`    | `Categories`    |
/// | `OrderBox`    | `OrderBoxes`    |
/// | `SalesPerson` | `SalesPeople`   |
/// | `Equipment`   | `Equipment`     |
pub fn pluralize(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }

    let split = last_word_start(word);
    let (head, last) = word.split_at(split);
    let lower = last.to_lowercase();

    if UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_string();
    }

    if let Some((_, plural)) = IRREGULAR.iter().find(|(single, _)| *single == lower) {
        return format!("{head}{}", match_case(last, plural));
    }

    format!("{head}{}", regular_plural(last))
}

/// Byte offset where the last word of a cased identifier starts.
fn last_word_start(word: &str) -> usize {
    word.char_indices()
        .filter(|(i, c)| *i > 0 && (c.is_uppercase() || *c == '_' || *c == '-'))
        .map(|(i, c)| if c == '_' || c == '-' { i + 1 } else { i })
        .last()
        .unwrap_or(0)
}

/// Carry the capitalisation of the first letter of `original` over to `plural`.
fn match_case(original: &str, plural: &str) -> String {
    let upper = original.chars().next().is_some_and(char::is_uppercase);
    if !upper {
        return plural.to_string();
    }
    let mut chars = plural.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn regular_plural(word: &str) -> String {
    let lower = word.to_lowercase();
    let before_last = lower.chars().rev().nth(1);
    let is_vowel = |c: Option<char>| matches!(c, Some('a' | 'e' | 'i' | 'o' | 'u'));

    if lower.ends_with('y') && !is_vowel(before_last) {
        return format!("{}ies", &word[..word.len() - 1]);
    }
    if ["s", "x", "z", "ch", "sh"].iter().any(|s| lower.ends_with(s)) {
        return format!("{word}es");
    }
    if lower.ends_with("fe") {
        return format!("{}ves", &word[..word.len() - 2]);
    }
    if lower.ends_with('f') && !lower.ends_with("ff") {
        return format!("{}ves", &word[..word.len() - 1]);
    }
    format!("{word}s")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regular_words_gain_s() {
        assert_eq!(pluralize("Invoice"), "Invoices");
        assert_eq!(pluralize("Order"), "Orders");
    }

    #[test]
    fn consonant_y_becomes_ies() {
        assert_eq!(pluralize("Category"), "Categories");
        assert_eq!(pluralize("Day"), "Days");
    }

    #[test]
    fn sibilants_gain_es() {
        assert_eq!(pluralize("Box"), "Boxes");
        assert_eq!(pluralize("Batch"), "Batches");
        assert_eq!(pluralize("Address"), "Addresses");
    }

    #[test]
    fn only_last_word_is_pluralised() {
        assert_eq!(pluralize("InvoiceLine"), "InvoiceLines");
        assert_eq!(pluralize("SalesPerson"), "SalesPeople");
        assert_eq!(pluralize("ProductCategory"), "ProductCategories");
    }

    #[test]
    fn irregular_and_uncountable() {
        assert_eq!(pluralize("Person"), "People");
        assert_eq!(pluralize("child"), "children");
        assert_eq!(pluralize("Equipment"), "Equipment");
        assert_eq!(pluralize("Knife"), "Knives");
    }

    #[test]
    fn case_helpers() {
        assert_eq!(pascal("invoice_line"), "InvoiceLine");
        assert_eq!(camel("InvoiceLine"), "invoiceLine");
        assert_eq!(kebab("InvoiceLines"), "invoice-lines");
        assert_eq!(snake("InvoiceLines"), "invoice_lines");
    }
}
