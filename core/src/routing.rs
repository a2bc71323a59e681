use rustc_hash::FxHashMap;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Page {
    Homepage,
    DomainInfo,
}

impl Page {
    pub fn as_str(&self) -> &'static str {
        match self {
            Page::Homepage => "homepage",
            Page::DomainInfo => "domain-info",
        }
    }
}

impl std::fmt::Display for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub page: Page,
    pub params: FxHashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("No routes found for \"{path}\".")]
pub struct RouteNotFound {
    pub path: String,
}

/// Static path -> page table. Matching is exact; no dynamic segments.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<(&'static str, Page)>,
}

impl RouteTable {
    pub fn new(routes: Vec<(&'static str, Page)>) -> Self {
        Self { routes }
    }

    /// The site's two pages: `/` and `/site.html`.
    pub fn site() -> Self {
        Self::new(vec![("/", Page::Homepage), ("/site.html", Page::DomainInfo)])
    }

    pub fn match_path(&self, path: &str) -> Result<RouteMatch, RouteNotFound> {
        self.routes
            .iter()
            .find(|(pattern, _)| *pattern == path)
            .map(|(_, page)| RouteMatch {
                page: *page,
                params: FxHashMap::default(),
            })
            .ok_or_else(|| RouteNotFound {
                path: path.to_string(),
            })
    }
}
