//! Structure discovery.
//!
//! Pulls structure definitions the compilation unit does not have yet from
//! the front-end's symbol space and appends them to the shared structure set.

use std::sync::Arc;

use shadegen_ir::{Declaration, StructureDefinition, StructureSet, SymbolSource};

use crate::error::DiscoveryFailure;

/// Returns the structure named `name`, discovering and registering it first
/// if needed.
///
/// Idempotent: a registered name is returned as-is. Lookup and insertion run
/// under the structure set's write lock, so concurrent discoverers of one name
/// observe a single definition. A failed lookup registers nothing.
pub fn discover_structure(
    structures: &StructureSet,
    symbols: &dyn SymbolSource,
    name: &str,
) -> Result<Arc<StructureDefinition>, DiscoveryFailure> {
    structures.get_or_try_insert_with(name, || {
        let declarations = symbols.declarations(name);
        match declarations.as_slice() {
            [] => Err(DiscoveryFailure::NotFound),
            [Declaration::Structure(sd)] => {
                log::debug!("discovered structure `{name}` ({} fields)", sd.fields.len());
                Ok(sd.clone())
            }
            [other] => Err(DiscoveryFailure::NotAStructure(other.kind_name())),
            many => Err(DiscoveryFailure::Ambiguous(many.len())),
        }
    })
}
