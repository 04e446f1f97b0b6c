use crate::auth::Authenticator;
use crate::error::{AccessDenied, StoreError};
use crate::models::{
    Inventory, MaterialFilter, MaterialMatch, RemnantRecord, SearchIndex, SortOrder, sort_records,
};
use crate::storage::{InventoryStorage, RemnantRepository};

/// What the customer catalog should show
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogQuery {
    pub material: MaterialFilter,
    pub search: String,
    pub sort: SortOrder,
}

/// A manager-view mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManagerAction {
    UpdateDimensions { id: i64, dimensions: String },
    Delete { id: i64 },
    Add(RemnantRecord),
}

/// Result of a manager action that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Updated { id: i64, dimensions: String, rows: usize },
    Deleted { id: i64, rows: usize },
    Added { id: i64 },
    /// The id matched nothing; the table was not written
    NotFound { id: i64 },
}

/// Ties the record store, search engine, and access gate together
///
/// Each method is one render of a view: read the (memoized) table, shape
/// it, and hand plain records back to the presentation layer.
pub struct App<S: InventoryStorage, A: Authenticator> {
    repository: RemnantRepository<S>,
    search: SearchIndex,
    authenticator: A,
}

impl<S: InventoryStorage, A: Authenticator> App<S, A> {
    pub fn new(storage: S, authenticator: A) -> Self {
        App {
            repository: RemnantRepository::new(storage),
            search: SearchIndex::new(),
            authenticator,
        }
    }

    pub fn with_material_match(mut self, material_match: MaterialMatch) -> Self {
        self.search = SearchIndex::new().with_material_match(material_match);
        self
    }

    pub fn repository(&mut self) -> &mut RemnantRepository<S> {
        &mut self.repository
    }

    /// Customer view: search, then material filter, then sort
    pub fn catalog(&mut self, query: &CatalogQuery) -> Result<Vec<RemnantRecord>, StoreError> {
        let records = self.repository.records()?;
        let searched = self.search.search(records, &query.search);
        let filtered = self.search.filter_by_material(searched, &query.material);

        let mut view: Vec<RemnantRecord> = filtered.into_iter().cloned().collect();
        sort_records(&mut view, query.sort);

        log::debug!(
            "Catalog query {:?} matched {} of {} remnants",
            query,
            view.len(),
            records.len()
        );
        Ok(view)
    }

    /// Material choices for the selector, without the "All" sentinel
    pub fn materials(&mut self) -> Result<Vec<String>, StoreError> {
        Ok(self.repository.inventory()?.materials())
    }

    /// Manager view: consult the access gate once, then expose mutations
    pub fn manager(&mut self, secret: &str) -> Result<ManagerSession<'_, S>, AccessDenied> {
        if !self.authenticator.authenticate(secret) {
            return Err(AccessDenied);
        }
        log::info!("Manager access granted");
        Ok(ManagerSession {
            repository: &mut self.repository,
        })
    }
}

/// Mutating access to the table, only obtainable through `App::manager`
pub struct ManagerSession<'a, S: InventoryStorage> {
    repository: &'a mut RemnantRepository<S>,
}

impl<S: InventoryStorage> ManagerSession<'_, S> {
    pub fn inventory(&mut self) -> Result<&Inventory, StoreError> {
        self.repository.inventory()
    }

    pub fn apply(&mut self, action: ManagerAction) -> Result<ActionOutcome, StoreError> {
        match action {
            ManagerAction::UpdateDimensions { id, dimensions } => {
                let rows = self.repository.update_dimensions(id, &dimensions)?;
                if rows == 0 {
                    return Ok(ActionOutcome::NotFound { id });
                }
                Ok(ActionOutcome::Updated {
                    id,
                    dimensions,
                    rows,
                })
            }
            ManagerAction::Delete { id } => {
                let rows = self.repository.delete(id)?;
                if rows == 0 {
                    return Ok(ActionOutcome::NotFound { id });
                }
                Ok(ActionOutcome::Deleted { id, rows })
            }
            ManagerAction::Add(record) => {
                let id = record.id;
                self.repository.add(record)?;
                Ok(ActionOutcome::Added { id })
            }
        }
    }
}
