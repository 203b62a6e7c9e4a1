//! Multi-model search target
//!
//! A search across several record types targets the union of their indices
//! (and, for typed indices, their type names). `MultiModel` derives both
//! lists from the registry so the request and the later reassembly agree on
//! which (index, type) pairs are in play.

use sift_core::{RecordType, SiftError, SiftResult};
use sift_engine::RegistrySnapshot;

/// Index and type names for a search across several record types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiModel {
    record_types: Vec<RecordType>,
    index_names: Vec<String>,
    document_types: Vec<String>,
}

impl MultiModel {
    /// Target the given record types. Each must be registered.
    pub fn new(snapshot: &RegistrySnapshot, record_types: &[RecordType]) -> SiftResult<Self> {
        if record_types.is_empty() {
            return Err(SiftError::invalid_input(
                "a multi-model search needs at least one record type",
            ));
        }
        let mut index_names: Vec<String> = Vec::new();
        let mut document_types: Vec<String> = Vec::new();
        for record_type in record_types {
            let mut found = false;
            for reg in snapshot.registrations_for(record_type) {
                found = true;
                if !index_names.contains(&reg.index_name) {
                    index_names.push(reg.index_name.clone());
                }
                if let Some(t) = &reg.type_name {
                    if !document_types.contains(t) {
                        document_types.push(t.clone());
                    }
                }
            }
            if !found {
                return Err(SiftError::invalid_input(format!(
                    "record type {} is not registered",
                    record_type
                )));
            }
        }
        Ok(Self {
            record_types: record_types.to_vec(),
            index_names,
            document_types,
        })
    }

    /// Target every registered record type.
    pub fn all(snapshot: &RegistrySnapshot) -> SiftResult<Self> {
        Self::new(snapshot, &snapshot.record_types())
    }

    /// Targeted record types.
    pub fn record_types(&self) -> &[RecordType] {
        &self.record_types
    }

    /// Distinct index names, in registration order.
    pub fn index_names(&self) -> &[String] {
        &self.index_names
    }

    /// Distinct type names of typed registrations; empty when all are typeless.
    pub fn document_types(&self) -> &[String] {
        &self.document_types
    }

    /// Comma-joined index list, as multi-index requests spell it.
    pub fn index_expression(&self) -> String {
        self.index_names.join(",")
    }
}
