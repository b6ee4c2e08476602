use crate::catalog::{CatalogError, InMemoryCatalog};

const SAMPLE_CATALOG: &str = include_str!("../data/sample_catalog.json");

/// A small catalog of real-world parts, enough to configure a complete build
/// without any external data source.
pub fn catalog() -> Result<InMemoryCatalog, CatalogError> {
    InMemoryCatalog::from_json_str(SAMPLE_CATALOG)
}

#[cfg(test)]
mod tests {
    use crate::component::Category;

    #[test]
    fn test_sample_catalog_parses() {
        let catalog = super::catalog().unwrap();
        let stats = catalog.stats();
        assert_eq!(stats.total, 14);
        assert_eq!(stats.counts[&Category::Cpu], 3);
        assert_eq!(stats.counts[&Category::Gpu], 3);
        assert_eq!(stats.counts[&Category::Psu], 2);
        assert_eq!(catalog.get(11).unwrap().spec("socket"), Some("AM4"));
    }
}
