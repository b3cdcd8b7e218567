use serde::{Deserialize, Serialize};

/// Simple aggregate counts for a catalog.
///
/// Returned by [`crate::Catalog::stats`]; counts reflect the catalog after
/// orphan attractions were dropped at load time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogStats {
    pub countries: usize,
    pub cities: usize,
    pub attractions: usize,
    pub destinations: usize,
}
