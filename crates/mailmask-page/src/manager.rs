//! Page manager for coordinating multiple open pages.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::info;

use mailmask_core::{
    Error, FieldReport, InjectionSettings, PageId, PageInfo, Result, ServerConfig,
};

use crate::page::Page;

/// Configuration for page manager.
#[derive(Debug, Clone)]
pub struct PageManagerConfig {
    /// Maximum number of open pages
    pub max_pages: usize,

    /// Settings applied to every page
    pub injection: InjectionSettings,
}

impl Default for PageManagerConfig {
    fn default() -> Self {
        Self {
            max_pages: 10,
            injection: InjectionSettings::default(),
        }
    }
}

impl From<&ServerConfig> for PageManagerConfig {
    fn from(config: &ServerConfig) -> Self {
        Self {
            max_pages: config.server.max_pages,
            injection: config.injection.clone(),
        }
    }
}

/// Page manager for coordinating multiple open pages.
pub struct PageManager {
    pages: Arc<RwLock<HashMap<PageId, Arc<Page>>>>,
    config: PageManagerConfig,
}

impl PageManager {
    /// Create a new page manager with default configuration.
    pub fn new() -> Self {
        Self::with_config(PageManagerConfig::default())
    }

    /// Create a new page manager with custom configuration.
    pub fn with_config(config: PageManagerConfig) -> Self {
        Self {
            pages: Arc::new(RwLock::new(HashMap::new())),
            config,
        }
    }

    /// Open a page and run its script-load pass.
    pub fn open_page(&self, html: &str, url: Option<String>) -> Result<(Arc<Page>, FieldReport)> {
        // Check page limit
        if self.page_count() >= self.config.max_pages {
            return Err(Error::PageLimitReached(self.config.max_pages));
        }

        let (page, report) = Page::open(html, url, self.config.injection.clone())?;
        let page_id = *page.id();
        let page = Arc::new(page);

        // Store page
        let mut pages = self.pages.write().unwrap_or_else(PoisonError::into_inner);
        if pages.len() >= self.config.max_pages {
            return Err(Error::PageLimitReached(self.config.max_pages));
        }
        pages.insert(page_id, Arc::clone(&page));

        Ok((page, report))
    }

    /// Get a page by ID.
    pub fn get_page(&self, page_id: &PageId) -> Result<Arc<Page>> {
        let pages = self.pages.read().unwrap_or_else(PoisonError::into_inner);
        pages
            .get(page_id)
            .cloned()
            .ok_or(Error::PageNotFound(*page_id))
    }

    /// List all open pages.
    pub fn list_pages(&self) -> Vec<PageInfo> {
        let pages = self.pages.read().unwrap_or_else(PoisonError::into_inner);
        let mut infos: Vec<PageInfo> = pages.values().map(|page| page.info()).collect();
        infos.sort_by_key(|info| info.page_id.to_string());
        infos
    }

    /// Close a page by ID.
    pub fn close_page(&self, page_id: &PageId) -> Result<()> {
        let mut pages = self.pages.write().unwrap_or_else(PoisonError::into_inner);
        pages
            .remove(page_id)
            .ok_or(Error::PageNotFound(*page_id))?;
        info!("Page closed: id={}", page_id);
        Ok(())
    }

    /// Close all pages.
    pub fn close_all(&self) {
        let mut pages = self.pages.write().unwrap_or_else(PoisonError::into_inner);
        let count = pages.len();
        pages.clear();
        info!("Closed {} page(s)", count);
    }

    /// Get the number of open pages.
    pub fn page_count(&self) -> usize {
        let pages = self.pages.read().unwrap_or_else(PoisonError::into_inner);
        pages.len()
    }

    /// Get the manager configuration.
    pub fn config(&self) -> &PageManagerConfig {
        &self.config
    }
}

impl Default for PageManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_manager_create() {
        let manager = PageManager::new();
        assert_eq!(manager.page_count(), 0);
        assert_eq!(manager.config().max_pages, 10);
    }

    #[test]
    fn test_page_manager_open_page() {
        let manager = PageManager::new();

        let (page, report) = manager
            .open_page(r#"<input type="email">"#, Some("https://example.com".to_string()))
            .unwrap();

        assert_eq!(manager.page_count(), 1);
        assert_eq!(report.page_id, *page.id());
        assert_eq!(page.url(), Some("https://example.com"));
    }

    #[test]
    fn test_page_manager_get_page() {
        let manager = PageManager::new();
        let (page, _) = manager.open_page("<p></p>", None).unwrap();

        let retrieved = manager.get_page(page.id()).unwrap();
        assert_eq!(retrieved.id(), page.id());
    }

    #[test]
    fn test_page_manager_get_nonexistent_page() {
        let manager = PageManager::new();
        let fake_id = PageId::new();

        let result = manager.get_page(&fake_id);
        assert!(matches!(result, Err(Error::PageNotFound(_))));
    }

    #[test]
    fn test_page_manager_limit() {
        let manager = PageManager::with_config(PageManagerConfig {
            max_pages: 2,
            ..Default::default()
        });

        manager.open_page("<p></p>", None).unwrap();
        manager.open_page("<p></p>", None).unwrap();
        let result = manager.open_page("<p></p>", None);

        assert!(matches!(result, Err(Error::PageLimitReached(2))));
        assert_eq!(manager.page_count(), 2);
    }

    #[test]
    fn test_page_manager_list_pages() {
        let manager = PageManager::new();
        manager.open_page(r#"<input name="email">"#, None).unwrap();
        manager.open_page("<p></p>", None).unwrap();

        let infos = manager.list_pages();
        assert_eq!(infos.len(), 2);
        assert_eq!(infos.iter().map(|i| i.processed_fields).sum::<usize>(), 1);
        assert!(infos.iter().all(|i| i.passes == 1));
    }

    #[test]
    fn test_page_manager_close_page() {
        let manager = PageManager::new();
        let (page, _) = manager.open_page("<p></p>", None).unwrap();
        let page_id = *page.id();

        manager.close_page(&page_id).unwrap();
        assert_eq!(manager.page_count(), 0);
        assert!(matches!(
            manager.close_page(&page_id),
            Err(Error::PageNotFound(_))
        ));
    }

    #[test]
    fn test_page_manager_close_all() {
        let manager = PageManager::new();
        manager.open_page("<p></p>", None).unwrap();
        manager.open_page("<p></p>", None).unwrap();

        manager.close_all();
        assert_eq!(manager.page_count(), 0);
    }

    #[test]
    fn test_config_from_server_config() {
        let mut server = ServerConfig::default();
        server.server.max_pages = 3;
        server.injection.marker_class = "relay".to_string();

        let config = PageManagerConfig::from(&server);
        assert_eq!(config.max_pages, 3);
        assert_eq!(config.injection.marker_class, "relay");
    }
}
