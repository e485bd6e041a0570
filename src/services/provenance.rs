//! Material provenance: flattens the recursive input-material tree of a lot
//! into display rows.

use serde::Serialize;
use tracing::debug;

use crate::common::non_empty;
use crate::i18n::country_display_name;
use crate::models::{InputMaterial, Lot};

pub const NOT_AVAILABLE: &str = "N/A";
pub const DEFAULT_MAX_DEPTH: usize = 8;

/// One material in the provenance tree, in depth-first order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProvenanceRow {
    /// 0 for direct inputs of the lot
    pub depth: usize,
    /// False when the material has no related lot with a product, in which
    /// case every descriptive field is a placeholder.
    pub traceable: bool,
    pub product_name: String,
    pub lot_number: String,
    pub quantity: Option<f64>,
    pub uom: Option<String>,
    pub region: String,
    /// Nested rows follow this one
    pub has_nested_materials: bool,
    /// The lot has inputs of its own that lie past the depth limit
    pub truncated: bool,
}

/// `"<state>, <country name>"` of a lot's production site, skipping absent
/// parts; `"N/A"` when neither is known.
pub fn lot_origin(lot: &Lot) -> String {
    let Some(location) = lot.production_location.as_ref() else {
        return NOT_AVAILABLE.to_string();
    };

    let parts: Vec<&str> = [
        non_empty(location.state.as_deref()),
        non_empty(location.country_code.as_deref()).map(country_display_name),
    ]
    .into_iter()
    .flatten()
    .collect();

    if parts.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        parts.join(", ")
    }
}

/// Depth-limited walk over input materials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProvenanceWalker {
    max_depth: usize,
}

impl Default for ProvenanceWalker {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

impl ProvenanceWalker {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub fn walk(&self, lot: &Lot) -> Vec<ProvenanceRow> {
        let mut rows = Vec::new();
        self.visit(&lot.input_material, 0, &mut rows);
        rows
    }

    fn visit(&self, materials: &[InputMaterial], depth: usize, rows: &mut Vec<ProvenanceRow>) {
        if depth >= self.max_depth {
            if !materials.is_empty() {
                debug!(depth, skipped = materials.len(), "provenance depth limit reached");
            }
            return;
        }

        for material in materials {
            let related = material.related_lot_id.as_deref();
            let product_name = related
                .and_then(|lot| lot.product.as_ref())
                .map(|product| {
                    non_empty(product.product_name.as_deref())
                        .unwrap_or(NOT_AVAILABLE)
                        .to_string()
                });

            match (related, product_name) {
                (Some(lot), Some(product_name)) => {
                    let has_inputs = !lot.input_material.is_empty();
                    let truncated = has_inputs && depth + 1 >= self.max_depth;
                    rows.push(ProvenanceRow {
                        depth,
                        traceable: true,
                        product_name,
                        lot_number: non_empty(lot.lot_number.as_deref())
                            .unwrap_or(NOT_AVAILABLE)
                            .to_string(),
                        quantity: material.quantity,
                        uom: material.uom.clone(),
                        region: lot_origin(lot),
                        has_nested_materials: has_inputs && !truncated,
                        truncated,
                    });
                    self.visit(&lot.input_material, depth + 1, rows);
                }
                _ => rows.push(ProvenanceRow {
                    depth,
                    traceable: false,
                    product_name: NOT_AVAILABLE.to_string(),
                    lot_number: NOT_AVAILABLE.to_string(),
                    quantity: material.quantity,
                    uom: material.uom.clone(),
                    region: NOT_AVAILABLE.to_string(),
                    has_nested_materials: false,
                    truncated: false,
                }),
            }
        }
    }
}

/// Provenance rows for a lot using the default depth limit.
pub fn material_provenance(lot: &Lot) -> Vec<ProvenanceRow> {
    ProvenanceWalker::default().walk(lot)
}
