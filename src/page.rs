//! Page context handed to [`Engine::load`](crate::Engine::load).

/// The page or route whose contents are being reconciled into the root.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Page {
    url: Option<String>,
}

impl Page {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
        }
    }

    /// A page without an address. Loading it is rejected.
    pub fn blank() -> Self {
        Self { url: None }
    }

    /// The resolved address, if any. Blank strings count as absent.
    pub fn url(&self) -> Option<&str> {
        self.url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_url() {
        assert_eq!(Page::new("/home").url(), Some("/home"));
        assert_eq!(Page::new("  /trim  ").url(), Some("/trim"));
        assert_eq!(Page::new("   ").url(), None);
        assert_eq!(Page::blank().url(), None);
        assert_eq!(Page::default(), Page::blank());
    }
}
