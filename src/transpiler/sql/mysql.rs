use crate::transpiler::dialect::{Dialect, FlavorOptions};
use crate::transpiler::traits::Flavor;

/// MySQL-style flavor, the default for every render path.
#[derive(Debug, Clone, Default)]
pub struct MySqlFlavor {
    options: FlavorOptions,
}

impl MySqlFlavor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: FlavorOptions) -> Self {
        Self { options }
    }
}

impl Flavor for MySqlFlavor {
    fn dialect(&self) -> Dialect {
        Dialect::MySql
    }

    fn options(&self) -> &FlavorOptions {
        &self.options
    }
}
