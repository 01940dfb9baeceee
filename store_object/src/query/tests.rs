//! List query tests

#[cfg(test)]
mod tests {
    use crate::query::{ListQuery, PageRequest, PaginationSettings, SortOrder};
    use crate::test_support::Critter;
    use crate::StoreError;

    fn settings() -> PaginationSettings {
        PaginationSettings::new(1, 10, 50)
    }

    // ========================================
    // Raw parameter parsing
    // ========================================

    #[test]
    fn test_from_raw_parses_numbers_and_order() {
        let query = ListQuery::from_raw(Some("2"), Some("25"), Some("name"), Some("DESC")).unwrap();
        assert_eq!(query.page, Some(2));
        assert_eq!(query.limit, Some(25));
        assert_eq!(query.sort.as_deref(), Some("name"));
        assert_eq!(query.order, Some(SortOrder::Desc));
    }

    #[test]
    fn test_from_raw_treats_blank_as_absent() {
        let query = ListQuery::from_raw(Some(" "), None, Some(""), None).unwrap();
        assert_eq!(query, ListQuery::new());
    }

    #[test]
    fn test_from_raw_rejects_non_numeric_page() {
        let err = ListQuery::from_raw(Some("two"), None, None, None).unwrap_err();
        assert!(matches!(err, StoreError::InvalidParameters(msg) if msg.contains("page")));
    }

    #[test]
    fn test_from_raw_rejects_unknown_order() {
        let err = ListQuery::from_raw(None, None, None, Some("sideways")).unwrap_err();
        assert!(matches!(err, StoreError::InvalidParameters(_)));
    }

    // ========================================
    // Resolution against an entity
    // ========================================

    #[test]
    fn test_resolve_normalizes_out_of_range_values() {
        let request = ListQuery::new()
            .page(0)
            .limit(1_000)
            .resolve::<Critter>(&settings())
            .unwrap();
        assert_eq!(request.page, 1);
        assert_eq!(request.limit, 50);
        assert_eq!(request.sort, None);
    }

    #[test]
    fn test_resolve_rejects_unknown_sort_field() {
        let err = ListQuery::new()
            .sort_by("kind; DROP TABLE critters", SortOrder::Asc)
            .resolve::<Critter>(&settings())
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidParameters(_)));
    }

    #[test]
    fn test_resolve_order_without_field_sorts_by_id() {
        let mut query = ListQuery::new();
        query.order = Some(SortOrder::Desc);
        let request = query.resolve::<Critter>(&settings()).unwrap();
        let sort = request.sort.unwrap();
        assert_eq!(sort.field, "id");
        assert_eq!(sort.order, SortOrder::Desc);
    }

    #[test]
    fn test_resolve_rejects_unknown_filter_field() {
        let err = ListQuery::new()
            .filter("name", "rex")
            .resolve::<Critter>(&settings())
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidParameters(msg) if msg.contains("name")));
    }

    #[test]
    fn test_resolve_drops_blank_filters() {
        let request = ListQuery::new()
            .filter("kind", "  ")
            .filter("legs", "4")
            .resolve::<Critter>(&settings())
            .unwrap();
        assert_eq!(request.filters.len(), 1);
        assert_eq!(request.filters.get("legs").map(String::as_str), Some("4"));
    }

    // ========================================
    // Cache parameters
    // ========================================

    #[test]
    fn test_cache_params_prefix_filters() {
        let request = ListQuery::new()
            .page(2)
            .limit(5)
            .sort_by("name", SortOrder::Asc)
            .filter("kind", "bird")
            .resolve::<Critter>(&settings())
            .unwrap();
        let params = request.cache_params();
        assert!(params.contains(&("filter.kind".to_string(), "bird".to_string())));
        assert!(params.contains(&("order".to_string(), "asc".to_string())));
        assert_eq!(request.offset(), 5);
    }

    #[test]
    fn test_page_request_new_floors_values() {
        let request = PageRequest::new(0, 0);
        assert_eq!(request.page, 1);
        assert_eq!(request.limit, 1);
    }
}
