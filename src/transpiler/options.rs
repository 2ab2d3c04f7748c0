use crate::ast::{DeleteMutation, InsertMutation, SelectQuery, TableSource, UpdateMutation};
use crate::transpiler::traits::Flavor;
use std::sync::Arc;

pub type TableHook = Arc<dyn Fn(&str) -> TableSource + Send + Sync>;
pub type SelectHook = Arc<dyn Fn(SelectQuery) -> SelectQuery + Send + Sync>;
pub type InsertHook = Arc<dyn Fn(InsertMutation) -> InsertMutation + Send + Sync>;
pub type UpdateHook = Arc<dyn Fn(UpdateMutation) -> UpdateMutation + Send + Sync>;
pub type DeleteHook = Arc<dyn Fn(DeleteMutation) -> DeleteMutation + Send + Sync>;

/// Transform hooks applied while rendering SQL.
///
/// The table hook sees every plain table name in FROM and JOIN position,
/// nested selects included. When it answers with a select, that select is
/// rendered with the remaining hooks but not with the table hook again.
#[derive(Clone, Default)]
pub struct RenderOptions {
    pub transform_table: Option<TableHook>,
    pub transform_select: Option<SelectHook>,
    pub transform_insert: Option<InsertHook>,
    pub transform_update: Option<UpdateHook>,
    pub transform_delete: Option<DeleteHook>,
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table_transform(
        mut self,
        hook: impl Fn(&str) -> TableSource + Send + Sync + 'static,
    ) -> Self {
        self.transform_table = Some(Arc::new(hook));
        self
    }

    pub fn with_select_transform(
        mut self,
        hook: impl Fn(SelectQuery) -> SelectQuery + Send + Sync + 'static,
    ) -> Self {
        self.transform_select = Some(Arc::new(hook));
        self
    }

    pub fn with_insert_transform(
        mut self,
        hook: impl Fn(InsertMutation) -> InsertMutation + Send + Sync + 'static,
    ) -> Self {
        self.transform_insert = Some(Arc::new(hook));
        self
    }

    pub fn with_update_transform(
        mut self,
        hook: impl Fn(UpdateMutation) -> UpdateMutation + Send + Sync + 'static,
    ) -> Self {
        self.transform_update = Some(Arc::new(hook));
        self
    }

    pub fn with_delete_transform(
        mut self,
        hook: impl Fn(DeleteMutation) -> DeleteMutation + Send + Sync + 'static,
    ) -> Self {
        self.transform_delete = Some(Arc::new(hook));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.transform_table.is_none()
            && self.transform_select.is_none()
            && self.transform_insert.is_none()
            && self.transform_update.is_none()
            && self.transform_delete.is_none()
    }
}

impl std::fmt::Debug for RenderOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderOptions")
            .field("transform_table", &self.transform_table.is_some())
            .field("transform_select", &self.transform_select.is_some())
            .field("transform_insert", &self.transform_insert.is_some())
            .field("transform_update", &self.transform_update.is_some())
            .field("transform_delete", &self.transform_delete.is_some())
            .finish()
    }
}

/// Flavor and hooks threaded through one render.
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    pub flavor: &'a dyn Flavor,
    pub options: &'a RenderOptions,
}

impl<'a> RenderContext<'a> {
    pub fn new(flavor: &'a dyn Flavor, options: &'a RenderOptions) -> Self {
        Self { flavor, options }
    }
}
