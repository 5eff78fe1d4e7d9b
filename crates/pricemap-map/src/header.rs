//! Header-name classifier.

use pricemap_model::Role;
use pricemap_standards::PatternCatalog;

pub struct HeaderClassifier<'a> {
    catalog: &'a PatternCatalog,
}

impl<'a> HeaderClassifier<'a> {
    pub fn new(catalog: &'a PatternCatalog) -> Self {
        Self { catalog }
    }

    /// Maps a header to a role by keyword containment.
    ///
    /// The first role in catalog order with a matching keyword wins. A match
    /// scores `header_base`, plus `header_exact_bonus` when the whole header
    /// equals the keyword. Blank headers give `(Undefined, 0)`.
    pub fn classify(&self, header: Option<&str>) -> (Role, f64) {
        let Some(lowered) = header
            .map(|text| text.trim().to_lowercase())
            .filter(|text| !text.is_empty())
        else {
            return (Role::Undefined, 0.0);
        };
        let thresholds = &self.catalog.thresholds;
        for entry in self.catalog.entries() {
            let mut hit = false;
            let mut exact = false;
            for keyword in &entry.header_keywords {
                if lowered == *keyword {
                    exact = true;
                    break;
                }
                if lowered.contains(keyword.as_str()) {
                    hit = true;
                }
            }
            if exact {
                return (entry.role, thresholds.header_base + thresholds.header_exact_bonus);
            }
            if hit {
                return (entry.role, thresholds.header_base);
            }
        }
        (Role::Undefined, 0.0)
    }
}
