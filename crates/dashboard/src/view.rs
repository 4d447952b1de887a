//! View-facing state for the product dashboard.
//!
//! [`DashboardView`] is an explicit state object the UI layer owns and
//! passes around; there is no ambient current-page or current-user global.
//! It is a pure consumer of the repository contract: it never touches the
//! network or the store itself, it only shapes a product list for display.
//!
//! The role gate here is display-only. A non-admin can trivially bypass it;
//! the server's credential check on mutating routes is the real boundary.

use rust_decimal::Decimal;

use brewdesk_core::{Product, Session};

/// Products shown per page.
pub const PAGE_SIZE: usize = 9;

/// Stock filter applied after the search query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StockFilter {
    #[default]
    All,
    /// Only products with stock below the low-stock threshold.
    LowStock,
}

/// One rendered page of the filtered catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct PageView {
    pub items: Vec<Product>,
    /// 1-based page number actually shown (clamped).
    pub page: usize,
    pub total_pages: usize,
    /// Matching products across all pages.
    pub total_matching: usize,
}

/// Headline widget numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogStats {
    pub total: usize,
    /// Sum of unit prices, not weighted by stock.
    pub total_value: Decimal,
    pub low_stock: usize,
}

/// UI actions, bound to handlers through a static table at initialization
/// rather than dispatched by evaluating names out of markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    AddProduct,
    EditProduct,
    DeleteProduct,
    ExportCatalog,
    ImportCatalog,
    Logout,
}

/// Action identifiers as they appear in `data-action` attributes.
pub const ACTION_TABLE: &[(&str, UiAction)] = &[
    ("add-product", UiAction::AddProduct),
    ("edit-product", UiAction::EditProduct),
    ("delete-product", UiAction::DeleteProduct),
    ("export-catalog", UiAction::ExportCatalog),
    ("import-catalog", UiAction::ImportCatalog),
    ("logout", UiAction::Logout),
];

impl UiAction {
    /// Look an identifier up in the static table. Unknown identifiers are
    /// ignored by the caller, never interpreted as code.
    #[must_use]
    pub fn lookup(identifier: &str) -> Option<Self> {
        ACTION_TABLE
            .iter()
            .find(|(name, _)| *name == identifier)
            .map(|(_, action)| *action)
    }

    /// Whether this action mutates the catalog and is therefore gated on
    /// the admin role.
    #[must_use]
    pub const fn requires_admin(self) -> bool {
        matches!(
            self,
            Self::AddProduct | Self::EditProduct | Self::DeleteProduct | Self::ImportCatalog
        )
    }
}

/// Pagination, search, and filter state for one dashboard session.
#[derive(Debug, Clone, Default)]
pub struct DashboardView {
    query: String,
    filter: StockFilter,
    page: usize,
    session: Option<Session>,
}

impl DashboardView {
    #[must_use]
    pub fn new(session: Option<Session>) -> Self {
        Self {
            query: String::new(),
            filter: StockFilter::All,
            page: 1,
            session,
        }
    }

    /// Set the search query. Resets to page 1 and clears the stock filter,
    /// matching the search box behavior.
    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_owned();
        self.filter = StockFilter::All;
        self.page = 1;
    }

    /// Set the stock filter and reset to page 1.
    pub fn set_filter(&mut self, filter: StockFilter) {
        self.filter = filter;
        self.page = 1;
    }

    /// Navigate to a 1-based page. Out-of-range values are clamped when the
    /// page is rendered, so stale pagination buttons cannot leave the view
    /// on an empty page.
    pub fn go_to_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    pub fn set_session(&mut self, session: Option<Session>) {
        self.session = session;
    }

    #[must_use]
    pub const fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Whether mutating controls render at all.
    #[must_use]
    pub fn can_mutate(&self) -> bool {
        self.session.as_ref().is_some_and(Session::is_admin)
    }

    /// Whether `action` is available to the current session.
    #[must_use]
    pub fn allows(&self, action: UiAction) -> bool {
        !action.requires_admin() || self.can_mutate()
    }

    /// Apply search, filter, and pagination to `products` and return the
    /// visible page. Order is preserved from the input (most-recent-first
    /// as the repository returns it).
    #[must_use]
    pub fn page_of(&self, products: &[Product]) -> PageView {
        let matching: Vec<&Product> = products
            .iter()
            .filter(|p| p.matches_query(&self.query))
            .filter(|p| match self.filter {
                StockFilter::All => true,
                StockFilter::LowStock => p.is_low_stock(),
            })
            .collect();

        let total_matching = matching.len();
        let total_pages = total_matching.div_ceil(PAGE_SIZE).max(1);
        let page = self.page.clamp(1, total_pages);
        let items = matching
            .into_iter()
            .skip((page - 1) * PAGE_SIZE)
            .take(PAGE_SIZE)
            .cloned()
            .collect();

        PageView {
            items,
            page,
            total_pages,
            total_matching,
        }
    }

    /// Widget numbers over the full (unfiltered) catalog.
    #[must_use]
    pub fn stats(products: &[Product]) -> CatalogStats {
        CatalogStats {
            total: products.len(),
            total_value: products.iter().map(|p| p.price.amount()).sum(),
            low_stock: products.iter().filter(|p| p.is_low_stock()).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brewdesk_core::{Price, Product, ProductId, seed_catalog};
    use rust_decimal::Decimal;

    fn product(id: &str, name: &str, price: &str, stock: u32) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_owned(),
            price: Price::parse(price).expect("price"),
            description: String::new(),
            category: None,
            stock,
            image: String::new(),
            created_at: None,
            updated_at: None,
        }
    }

    fn catalog(count: usize) -> Vec<Product> {
        (0..count)
            .map(|i| product(&format!("p_{i}"), &format!("Brew {i}"), "4.50", 20))
            .collect()
    }

    #[test]
    fn pagination_uses_nine_per_page() {
        let view = DashboardView::new(None);
        let page = view.page_of(&catalog(10));
        assert_eq!(page.items.len(), 9);
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.total_matching, 10);
    }

    #[test]
    fn out_of_range_page_is_clamped() {
        let mut view = DashboardView::new(None);
        view.go_to_page(99);
        let page = view.page_of(&catalog(10));
        assert_eq!(page.page, 2);
        assert_eq!(page.items.len(), 1);
        view.go_to_page(0);
        assert_eq!(view.page_of(&catalog(10)).page, 1);
    }

    #[test]
    fn search_is_case_insensitive_over_name_and_description() {
        let mut products = seed_catalog();
        products.push(product("p_x", "Flat White", "5.00", 3));
        let mut view = DashboardView::new(None);
        view.set_query("LATTE");
        let page = view.page_of(&products);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].name, "Latte");
    }

    #[test]
    fn search_resets_page_and_filter() {
        let mut view = DashboardView::new(None);
        view.set_filter(StockFilter::LowStock);
        view.go_to_page(3);
        view.set_query("esp");
        let page = view.page_of(&catalog(30));
        // Query "esp" matches nothing, but the filter and page were reset.
        assert_eq!(page.page, 1);
        assert_eq!(page.total_matching, 0);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn low_stock_filter_uses_threshold_of_ten() {
        let products = vec![
            product("p_1", "Espresso", "3.00", 9),
            product("p_2", "Latte", "4.00", 10),
            product("p_3", "Mocha", "5.00", 0),
        ];
        let mut view = DashboardView::new(None);
        view.set_filter(StockFilter::LowStock);
        let page = view.page_of(&products);
        assert_eq!(page.items.len(), 2);
        assert!(page.items.iter().all(Product::is_low_stock));
    }

    #[test]
    fn stats_sum_unit_prices() {
        let products = vec![
            product("p_1", "Espresso", "3.00", 9),
            product("p_2", "Latte", "4.50", 20),
        ];
        let stats = DashboardView::stats(&products);
        assert_eq!(stats.total, 2);
        assert_eq!(stats.total_value, Decimal::new(750, 2));
        assert_eq!(stats.low_stock, 1);
    }

    #[test]
    fn mutating_actions_are_admin_gated() {
        let view = DashboardView::new(None);
        assert!(!view.allows(UiAction::DeleteProduct));
        assert!(view.allows(UiAction::ExportCatalog));
        assert!(view.allows(UiAction::Logout));
    }

    #[test]
    fn action_lookup_is_table_driven() {
        assert_eq!(UiAction::lookup("add-product"), Some(UiAction::AddProduct));
        assert_eq!(UiAction::lookup("alert('x')"), None);
    }
}
