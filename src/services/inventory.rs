//! Inventory controller: owns the product tiers shown by the inventory view.
//!
//! The full load (`all`), the filtered subset (`filtered`) and the page on
//! screen (`displayed`) are kept consistent after every operation. `displayed`
//! is always `filtered[offset..offset + limit]` and is never edited directly.
//!
//! Every fetch receives a [`Generation`]. Only the response of the latest
//! generation is applied; older responses are discarded when they arrive.

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use crate::domain::category::Category;
use crate::domain::filter::FilterCriteria;
use crate::domain::pagination::{
    PAGE_SIZE_CHOICES, PageChange, PaginationState, is_supported_page_size,
};
use crate::domain::product::{Product, ProductDraft};
use crate::forms::products::{FormErrors, ProductForm};
use crate::notify::{Notifier, Severity};
use crate::repository::{CategoryReader, ProductReader, ProductWriter};
use crate::services::{ServiceError, ServiceResult};

const LOAD_FAILED: &str = "Failed to load products";
const SEARCH_DEGRADED: &str = "Title search is unavailable, showing matches from loaded products";
const CATEGORIES_FAILED: &str = "Failed to load categories";
const DEFAULT_IMAGE_NOTICE: &str = "No image supplied, the default image was used";
const CREATED: &str = "Product created";
const CREATE_FAILED: &str = "Failed to create product";
const UPDATED: &str = "Product updated";
const UPDATE_FAILED: &str = "Failed to update product";
const DELETED: &str = "Product deleted";
const DELETE_FAILED: &str = "Failed to delete product";

/// Asks the user whether a product should really be deleted.
pub trait ConfirmDelete {
    fn confirm_delete(&self, product: &Product) -> bool;
}

/// Token identifying one dispatched fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generation(u64);

/// Which product form is open.
#[derive(Debug, Clone, PartialEq)]
pub enum FormMode {
    Create,
    /// Editing the contained product; updates are addressed to its id.
    Edit(Product),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Cancelled,
}

/// Product tiers, pagination and bookkeeping for in-flight requests.
#[derive(Debug, Default)]
pub struct InventoryState {
    all: Vec<Product>,
    filtered: Vec<Product>,
    displayed: Vec<Product>,
    pagination: PaginationState,
    criteria: FilterCriteria,
    form: Option<FormMode>,
    generation: u64,
    in_flight: usize,
}

impl InventoryState {
    pub fn all(&self) -> &[Product] {
        &self.all
    }

    pub fn filtered(&self) -> &[Product] {
        &self.filtered
    }

    pub fn displayed(&self) -> &[Product] {
        &self.displayed
    }

    pub fn pagination(&self) -> PaginationState {
        self.pagination
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn form(&self) -> Option<&FormMode> {
        self.form.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    /// Register a new fetch; it supersedes every fetch started before it.
    pub fn begin_fetch(&mut self) -> Generation {
        self.generation += 1;
        Generation(self.generation)
    }

    /// Apply a full load. Returns `false` when the fetch was superseded.
    pub fn finish_load(&mut self, generation: Generation, products: Vec<Product>) -> bool {
        if !self.is_current(generation) {
            return false;
        }

        self.all = products;
        self.filtered = self.all.clone();
        self.criteria = FilterCriteria::default();
        self.pagination.reset(self.filtered.len());
        self.refresh_displayed();
        true
    }

    /// Apply a filter result. Returns `false` when the fetch was superseded.
    pub fn finish_filter(
        &mut self,
        generation: Generation,
        criteria: FilterCriteria,
        products: Vec<Product>,
    ) -> bool {
        if !self.is_current(generation) {
            return false;
        }

        self.filtered = products;
        self.criteria = criteria;
        self.pagination.reset(self.filtered.len());
        self.refresh_displayed();
        true
    }

    /// Whether `generation` is still the latest fetch.
    pub fn is_current(&self, generation: Generation) -> bool {
        generation.0 == self.generation
    }

    /// Move to another page or page size. A new limit always restarts at offset 0.
    pub fn change_page(&mut self, change: PageChange) -> ServiceResult<()> {
        match (change.limit, change.offset) {
            (Some(limit), _) => {
                if !is_supported_page_size(limit) {
                    return Err(ServiceError::UnsupportedPageSize(limit));
                }
                self.pagination.limit = limit;
                self.pagination.offset = 0;
            }
            (None, Some(offset)) => self.pagination.offset = offset,
            (None, None) => {}
        }

        self.refresh_displayed();
        Ok(())
    }

    pub fn open_form(&mut self, mode: FormMode) {
        self.form = Some(mode);
    }

    pub fn close_form(&mut self) {
        self.form = None;
    }

    fn editing_product_id(&self) -> Option<i32> {
        match &self.form {
            Some(FormMode::Edit(product)) => Some(product.id),
            _ => None,
        }
    }

    /// Look a product up among the filtered records, then the full load.
    pub fn find(&self, product_id: i32) -> Option<&Product> {
        self.filtered
            .iter()
            .chain(self.all.iter())
            .find(|product| product.id == product_id)
    }

    pub fn view(&self) -> InventoryView {
        InventoryView {
            products: self.displayed.clone(),
            loading: self.is_loading(),
            pagination: PaginationView::from(self.pagination),
            criteria: self.criteria.clone(),
            page_sizes: PAGE_SIZE_CHOICES.to_vec(),
            form_open: self.form.is_some(),
        }
    }

    fn refresh_displayed(&mut self) {
        self.displayed = self.pagination.slice(&self.filtered).to_vec();
    }
}

/// Snapshot rendered by the inventory page.
#[derive(Debug, Clone, Serialize)]
pub struct InventoryView {
    pub products: Vec<Product>,
    pub loading: bool,
    pub pagination: PaginationView,
    pub criteria: FilterCriteria,
    pub page_sizes: Vec<usize>,
    pub form_open: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaginationView {
    pub offset: usize,
    pub limit: usize,
    pub total: usize,
    /// One-based page number for display.
    pub page_number: usize,
    pub total_pages: usize,
    pub previous_offset: Option<usize>,
    pub next_offset: Option<usize>,
}

impl From<PaginationState> for PaginationView {
    fn from(state: PaginationState) -> Self {
        Self {
            offset: state.offset,
            limit: state.limit,
            total: state.total,
            page_number: state.page() + 1,
            total_pages: state.total_pages(),
            previous_offset: state.previous_offset(),
            next_offset: state.next_offset(),
        }
    }
}

/// Data required to render the create or edit product form.
#[derive(Debug, Clone, Serialize)]
pub struct ProductFormData {
    pub form: ProductForm,
    pub categories: Vec<Category>,
    /// Identifier of the edited product; `None` when creating.
    pub product_id: Option<i32>,
    pub errors: FormErrors,
}

/// Counts one catalog request as in flight until dropped.
struct InFlight<'a> {
    state: &'a Mutex<InventoryState>,
}

impl<'a> InFlight<'a> {
    fn enter(state: &'a Mutex<InventoryState>) -> Self {
        lock(state).in_flight += 1;
        Self { state }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut state = lock(self.state);
        state.in_flight = state.in_flight.saturating_sub(1);
    }
}

fn lock(state: &Mutex<InventoryState>) -> MutexGuard<'_, InventoryState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Mediates between the presentation layer and the catalog repository.
pub struct InventoryController<R> {
    repo: R,
    load_limit: usize,
    state: Mutex<InventoryState>,
}

impl<R> InventoryController<R> {
    /// Create a controller that loads at most `load_limit` products at once.
    pub fn new(repo: R, load_limit: usize) -> Self {
        Self {
            repo,
            load_limit,
            state: Mutex::new(InventoryState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, InventoryState> {
        lock(&self.state)
    }

    fn track(&self) -> InFlight<'_> {
        InFlight::enter(&self.state)
    }

    pub fn view(&self) -> InventoryView {
        self.state().view()
    }

    pub fn is_loading(&self) -> bool {
        self.state().is_loading()
    }

    pub fn find_product(&self, product_id: i32) -> Option<Product> {
        self.state().find(product_id).cloned()
    }

    pub fn form_mode(&self) -> Option<FormMode> {
        self.state().form().cloned()
    }

    pub fn change_page(&self, change: PageChange) -> ServiceResult<()> {
        self.state().change_page(change)
    }

    /// Make `product` the edit context without rendering a form.
    pub fn begin_edit(&self, product: Product) {
        self.state().open_form(FormMode::Edit(product));
    }

    pub fn close_form(&self) {
        self.state().close_form();
    }
}

impl<R> InventoryController<R>
where
    R: ProductReader + ProductWriter + CategoryReader,
{
    /// Replace every tier with a fresh fetch and return to the first page.
    ///
    /// On failure the state is left untouched.
    pub async fn load<N>(&self, notifier: &N) -> ServiceResult<()>
    where
        N: Notifier + ?Sized,
    {
        let _in_flight = self.track();
        let generation = self.state().begin_fetch();

        match self.repo.list_products(0, self.load_limit).await {
            Ok(products) => {
                let fetched = products.len();
                let applied = self.state().finish_load(generation, products);
                if !applied {
                    log::debug!("Discarding superseded product load {generation:?}");
                } else if fetched >= self.load_limit {
                    log::warn!(
                        "Product load reached the bound of {} records; date filtering only covers them",
                        self.load_limit
                    );
                }
                Ok(())
            }
            Err(err) => {
                let current = self.state().is_current(generation);
                log::error!("Failed to load products: {err}");
                if current {
                    notifier.notify(Severity::Error, LOAD_FAILED);
                }
                Err(ServiceError::from(err))
            }
        }
    }

    /// Recompute the filtered tier from `criteria` and return to the first page.
    pub async fn apply_filter<N>(&self, criteria: FilterCriteria, notifier: &N) -> ServiceResult<()>
    where
        N: Notifier + ?Sized,
    {
        let criteria = criteria.normalized();
        let _in_flight = self.track();
        let (generation, all) = {
            let mut state = self.state();
            (state.begin_fetch(), state.all().to_vec())
        };

        let mut degraded = false;
        let mut candidates = match criteria.title_term() {
            Some(term) => match self.repo.search_products_by_title(term).await {
                Ok(found) => found,
                Err(err) => {
                    log::warn!("Title search for `{term}` failed, filtering loaded products: {err}");
                    degraded = true;
                    all
                }
            },
            None => all,
        };
        let matcher = criteria.matcher();
        candidates.retain(|product| matcher.matches(product));

        if !self.state().finish_filter(generation, criteria, candidates) {
            log::debug!("Discarding superseded filter result {generation:?}");
        } else if degraded {
            notifier.notify(Severity::Warning, SEARCH_DEGRADED);
        }
        Ok(())
    }

    /// Categories offered by the product form. Failures degrade to an empty list.
    pub async fn load_categories<N>(&self, notifier: &N) -> Vec<Category>
    where
        N: Notifier + ?Sized,
    {
        match self.repo.list_categories().await {
            Ok(categories) => categories,
            Err(err) => {
                log::error!("Failed to load categories: {err}");
                notifier.notify(Severity::Error, CATEGORIES_FAILED);
                Vec::new()
            }
        }
    }

    pub async fn open_create<N>(&self, notifier: &N) -> ProductFormData
    where
        N: Notifier + ?Sized,
    {
        self.state().open_form(FormMode::Create);
        let categories = self.load_categories(notifier).await;

        ProductFormData {
            form: ProductForm::default(),
            categories,
            product_id: None,
            errors: FormErrors::new(),
        }
    }

    /// Open the edit form pre-filled from `product`.
    pub async fn open_edit<N>(&self, product: Product, notifier: &N) -> ProductFormData
    where
        N: Notifier + ?Sized,
    {
        let form = ProductForm::from(&product);
        let product_id = product.id;
        self.begin_edit(product);
        let categories = self.load_categories(notifier).await;

        ProductFormData {
            form,
            categories,
            product_id: Some(product_id),
            errors: FormErrors::new(),
        }
    }

    pub async fn submit_create<N>(&self, form: ProductForm, notifier: &N) -> ServiceResult<Product>
    where
        N: Notifier + ?Sized,
    {
        let draft = prepare_draft(form, notifier)?;

        let result = {
            let _in_flight = self.track();
            self.repo.create_product(&draft).await
        };

        match result {
            Ok(created) => {
                self.close_form();
                self.reload_after_mutation(notifier).await;
                notifier.notify(Severity::Success, CREATED);
                Ok(created)
            }
            Err(err) => {
                log::error!("Failed to create product: {err}");
                notifier.notify(Severity::Error, CREATE_FAILED);
                Err(ServiceError::from(err))
            }
        }
    }

    /// Submit the edit form for the product currently open for editing.
    pub async fn submit_update<N>(&self, form: ProductForm, notifier: &N) -> ServiceResult<Product>
    where
        N: Notifier + ?Sized,
    {
        let product_id = self
            .state()
            .editing_product_id()
            .ok_or(ServiceError::NoEditContext)?;
        let draft = prepare_draft(form, notifier)?;

        let result = {
            let _in_flight = self.track();
            self.repo.update_product(product_id, &draft).await
        };

        match result {
            Ok(updated) => {
                self.close_form();
                self.reload_after_mutation(notifier).await;
                notifier.notify(Severity::Success, UPDATED);
                Ok(updated)
            }
            Err(err) => {
                log::error!("Failed to update product {product_id}: {err}");
                notifier.notify(Severity::Error, UPDATE_FAILED);
                Err(ServiceError::from(err))
            }
        }
    }

    /// Delete `product` once `confirmation` agrees; nothing is sent otherwise.
    pub async fn delete<C, N>(
        &self,
        product: &Product,
        confirmation: &C,
        notifier: &N,
    ) -> ServiceResult<DeleteOutcome>
    where
        C: ConfirmDelete + ?Sized,
        N: Notifier + ?Sized,
    {
        if !confirmation.confirm_delete(product) {
            log::debug!("Deletion of product {} cancelled", product.id);
            return Ok(DeleteOutcome::Cancelled);
        }

        let result = {
            let _in_flight = self.track();
            self.repo.delete_product(product.id).await
        };

        match result {
            Ok(()) => {
                self.reload_after_mutation(notifier).await;
                notifier.notify(Severity::Success, DELETED);
                Ok(DeleteOutcome::Deleted)
            }
            Err(err) => {
                log::error!("Failed to delete product {}: {err}", product.id);
                notifier.notify(Severity::Error, DELETE_FAILED);
                Err(ServiceError::from(err))
            }
        }
    }

    async fn reload_after_mutation<N>(&self, notifier: &N)
    where
        N: Notifier + ?Sized,
    {
        if let Err(err) = self.load(notifier).await {
            log::warn!("Reload after a successful change failed: {err}");
        }
    }
}

fn prepare_draft<N>(form: ProductForm, notifier: &N) -> ServiceResult<ProductDraft>
where
    N: Notifier + ?Sized,
{
    let validation = form.validate_draft();
    if validation.default_image_applied {
        notifier.notify(Severity::Warning, DEFAULT_IMAGE_NOTICE);
    }
    validation.into_draft().map_err(ServiceError::Form)
}
