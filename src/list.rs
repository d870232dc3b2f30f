//! List page state: filters and pagination over one resource's cached list
//! query.

use crate::client::ResourceClient;
use crate::error::ApiError;
use crate::pagination::Pagination;
use crate::response::Page;
use crate::service::Resource;

pub struct ListController<R: Resource> {
    resource: ResourceClient<R>,
    pagination: Pagination,
    filters: R::Filters,
    current: Option<Page<R::Item>>,
}

impl<R: Resource> ListController<R> {
    pub fn new(resource: ResourceClient<R>, page_size: u32) -> Self {
        ListController {
            resource,
            pagination: Pagination::new(1, page_size, 0),
            filters: R::Filters::default(),
            current: None,
        }
    }

    /// Fetch the current page and adopt its total. The previous page stays
    /// visible when the fetch fails.
    pub async fn load(&mut self) -> Result<&Page<R::Item>, ApiError> {
        let params = self.pagination.params();
        let page = self.resource.list(params, &self.filters).await?;
        self.pagination.set_total_items(page.total);
        Ok(&*self.current.insert(page))
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn filters(&self) -> &R::Filters {
        &self.filters
    }

    /// Last loaded page.
    pub fn current(&self) -> Option<&Page<R::Item>> {
        self.current.as_ref()
    }

    pub fn items(&self) -> &[R::Item] {
        self.current.as_ref().map(|p| p.items.as_slice()).unwrap_or(&[])
    }

    /// New filters always start from the first page.
    pub fn set_filters(&mut self, filters: R::Filters) {
        self.filters = filters;
        self.pagination.go_to_page(1);
    }

    pub fn clear_filters(&mut self) {
        self.set_filters(R::Filters::default());
    }

    pub fn go_to_page(&mut self, page: u32) {
        self.pagination.go_to_page(page);
    }

    pub fn next_page(&mut self) {
        self.pagination.next_page();
    }

    pub fn previous_page(&mut self) {
        self.pagination.previous_page();
    }

    pub fn set_limit(&mut self, limit: u32) {
        self.pagination.set_limit(limit);
    }
}
