// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mxstream-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mxstream and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One validated edit instruction against a cell list.
///
/// Serializes back to the wire shape (`{"operation": "update", "cell_id": .., "new_xml": ..}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "lowercase")]
pub enum EditOp {
    Add { new_xml: String },
    Update { cell_id: String, new_xml: String },
    Delete { cell_id: String },
}

impl EditOp {
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Add { .. } => OperationKind::Add,
            Self::Update { .. } => OperationKind::Update,
            Self::Delete { .. } => OperationKind::Delete,
        }
    }

    /// Target id for update/delete; `None` for add.
    pub fn cell_id(&self) -> Option<&str> {
        match self {
            Self::Add { .. } => None,
            Self::Update { cell_id, .. } | Self::Delete { cell_id } => Some(cell_id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Add,
    Update,
    Delete,
}

impl OperationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An `edit_diagram` operation exactly as the model sends it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EditOperation {
    /// What to do with the cell.
    pub operation: OperationKind,
    /// Id of the cell to update or delete. For `add`, the id of the new cell.
    #[serde(default)]
    pub cell_id: String,
    /// Complete replacement `<mxCell>` element; required for `add` and `update`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_xml: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditOpError {
    #[error("{operation} operation is missing new_xml (cell_id={cell_id:?})")]
    MissingNewXml { operation: OperationKind, cell_id: String },
    #[error("{operation} operation is missing cell_id")]
    MissingCellId { operation: OperationKind },
}

impl TryFrom<EditOperation> for EditOp {
    type Error = EditOpError;

    fn try_from(wire: EditOperation) -> Result<Self, Self::Error> {
        let EditOperation { operation, cell_id, new_xml } = wire;
        let new_xml = new_xml.filter(|xml| !xml.is_empty());

        if operation != OperationKind::Add && cell_id.is_empty() {
            return Err(EditOpError::MissingCellId { operation });
        }

        match (operation, new_xml) {
            (OperationKind::Add, Some(new_xml)) => Ok(Self::Add { new_xml }),
            (OperationKind::Update, Some(new_xml)) => Ok(Self::Update { cell_id, new_xml }),
            (OperationKind::Delete, _) => Ok(Self::Delete { cell_id }),
            (operation, None) => Err(EditOpError::MissingNewXml { operation, cell_id }),
        }
    }
}

impl From<&EditOp> for EditOperation {
    fn from(op: &EditOp) -> Self {
        match op {
            EditOp::Add { new_xml } => Self {
                operation: OperationKind::Add,
                cell_id: String::new(),
                new_xml: Some(new_xml.clone()),
            },
            EditOp::Update { cell_id, new_xml } => Self {
                operation: OperationKind::Update,
                cell_id: cell_id.clone(),
                new_xml: Some(new_xml.clone()),
            },
            EditOp::Delete { cell_id } => Self {
                operation: OperationKind::Delete,
                cell_id: cell_id.clone(),
                new_xml: None,
            },
        }
    }
}

/// Parses a JSON `operations` array one element at a time.
///
/// Elements that fail to decode or validate are dropped (and logged); the rest keep their
/// order.
pub fn parse_operations(values: &[serde_json::Value]) -> Vec<EditOp> {
    values
        .iter()
        .enumerate()
        .filter_map(|(index, value)| {
            let wire = match EditOperation::deserialize(value) {
                Ok(wire) => wire,
                Err(err) => {
                    log::debug!(index; "dropping undecodable edit operation: {err}");
                    return None;
                }
            };
            match EditOp::try_from(wire) {
                Ok(op) => Some(op),
                Err(err) => {
                    log::debug!(index; "dropping invalid edit operation: {err}");
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{parse_operations, EditOp, EditOpError, EditOperation, OperationKind};

    #[test]
    fn wire_operations_convert_to_edit_ops() {
        let wire: EditOperation =
            serde_json::from_value(json!({"operation": "update", "cell_id": "n1", "new_xml": "<x/>"}))
                .expect("decode");
        assert_eq!(
            EditOp::try_from(wire),
            Ok(EditOp::Update { cell_id: "n1".to_owned(), new_xml: "<x/>".to_owned() })
        );
    }

    #[test]
    fn add_without_cell_id_is_accepted() {
        let wire: EditOperation =
            serde_json::from_value(json!({"operation": "add", "new_xml": "<x/>"})).expect("decode");
        assert_eq!(EditOp::try_from(wire), Ok(EditOp::Add { new_xml: "<x/>".to_owned() }));
    }

    #[test]
    fn update_without_new_xml_is_rejected() {
        let wire = EditOperation {
            operation: OperationKind::Update,
            cell_id: "n1".to_owned(),
            new_xml: Some(String::new()),
        };
        assert_eq!(
            EditOp::try_from(wire),
            Err(EditOpError::MissingNewXml {
                operation: OperationKind::Update,
                cell_id: "n1".to_owned()
            })
        );
    }

    #[test]
    fn delete_without_cell_id_is_rejected() {
        let wire = EditOperation {
            operation: OperationKind::Delete,
            cell_id: String::new(),
            new_xml: None,
        };
        assert_eq!(
            EditOp::try_from(wire),
            Err(EditOpError::MissingCellId { operation: OperationKind::Delete })
        );
    }

    #[test]
    fn parse_operations_drops_bad_elements_and_keeps_order() {
        let values = vec![
            json!({"operation": "delete", "cell_id": "a"}),
            json!({"operation": "rename", "cell_id": "b"}),
            json!("not an object"),
            json!({"operation": "add"}),
            json!({"operation": "add", "cell_id": "c", "new_xml": "<mxCell id=\"c\"/>"}),
        ];
        let ops = parse_operations(&values);
        assert_eq!(
            ops,
            vec![
                EditOp::Delete { cell_id: "a".to_owned() },
                EditOp::Add { new_xml: "<mxCell id=\"c\"/>".to_owned() },
            ]
        );
    }

    #[test]
    fn edit_ops_serialize_in_wire_shape() {
        let op = EditOp::Update { cell_id: "n1".to_owned(), new_xml: "<x/>".to_owned() };
        assert_eq!(
            serde_json::to_value(&op).expect("serialize"),
            json!({"operation": "update", "cell_id": "n1", "new_xml": "<x/>"})
        );
        let wire = EditOperation::from(&EditOp::Delete { cell_id: "d".to_owned() });
        assert_eq!(
            serde_json::to_value(&wire).expect("serialize"),
            json!({"operation": "delete", "cell_id": "d"})
        );
    }
}
