/// Page views the site renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Chrome,   // Header, ticker, footer around every page
    Home,     // Hero and home sections
    Category, // Category listing
    Article,  // Single article
    EPaper,   // E-paper archive
    About,    // Static about page
    Admin,    // Editor dashboard
}

impl View {
    pub fn name(self) -> &'static str {
        match self {
            View::Chrome => "chrome",
            View::Home => "home",
            View::Category => "category",
            View::Article => "article",
            View::EPaper => "epaper",
            View::About => "about",
            View::Admin => "admin",
        }
    }
}

/// A path pattern bound to a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub pattern: &'static str,
    /// Match only the exact path, not everything below it.
    pub exact: bool,
    pub view: View,
}

impl Route {
    pub const fn prefix(pattern: &'static str, view: View) -> Self {
        Self {
            pattern,
            exact: false,
            view,
        }
    }

    pub const fn exact(pattern: &'static str, view: View) -> Self {
        Self {
            pattern,
            exact: true,
            view,
        }
    }

    /// Plain string comparison: a prefix route also matches paths that
    /// merely start with its pattern (`/category` matches `/categoryx`).
    pub fn matches(&self, path: &str) -> bool {
        if self.exact {
            path == self.pattern
        } else {
            path.starts_with(self.pattern)
        }
    }
}

/// Declared routes. Every route is checked on its own; several may match
/// the same path, and none matching means nothing renders.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    /// The news site's pages.
    pub fn site() -> Self {
        Self::new(vec![
            Route::prefix("/", View::Chrome),
            Route::exact("/", View::Home),
            Route::prefix("/category", View::Category),
            Route::prefix("/article", View::Article),
            Route::prefix("/epaper", View::EPaper),
            Route::prefix("/about", View::About),
            Route::prefix("/admin", View::Admin),
        ])
    }

    /// Views for every matching route, in declaration order.
    pub fn matching(&self, path: &str) -> Vec<View> {
        self.routes
            .iter()
            .filter(|r| r.matches(path))
            .map(|r| r.view)
            .collect()
    }
}
