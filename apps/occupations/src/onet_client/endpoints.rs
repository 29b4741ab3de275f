/// URL shapes of the occupation web service.
///
/// The keyword is embedded verbatim; reqwest percent-encodes whatever the URL
/// parser requires and nothing more.
#[derive(Debug, Clone)]
pub struct Endpoints {
    base_url: String,
}

impl Endpoints {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Keyword search over military titles and codes.
    pub fn search(&self, keyword: &str) -> String {
        format!("{}/veterans/military?keyword={keyword}", self.base_url)
    }

    /// Detail document for one classification code. Always ends in `/`.
    pub fn occupation(&self, code: &str) -> String {
        format!("{}/online/occupations/{code}/", self.base_url)
    }

    /// Task sub-resource, derived from the detail URL.
    pub fn tasks(detail_url: &str) -> String {
        format!("{detail_url}details/tasks")
    }
}
