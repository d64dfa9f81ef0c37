use crate::error::{invalid_argument, FirestoreResult};
use crate::model::{FieldPath, Timestamp};
use crate::value::{FirestoreValue, ValueKind};

/// A transform applied to one field of a document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldTransform {
    field_path: FieldPath,
    operation: TransformOperation,
}

impl FieldTransform {
    pub fn new(field_path: FieldPath, operation: TransformOperation) -> Self {
        Self {
            field_path,
            operation,
        }
    }

    pub fn field_path(&self) -> &FieldPath {
        &self.field_path
    }

    pub fn operation(&self) -> &TransformOperation {
        &self.operation
    }
}

/// The server-side operations a [`FieldTransform`] can request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransformOperation {
    /// Replace the field with the commit time of the write.
    ServerTimestamp,
    /// Append the elements not already present in the array.
    ArrayUnion(Vec<FirestoreValue>),
    /// Remove every occurrence of the elements from the array.
    ArrayRemove(Vec<FirestoreValue>),
    /// Add the operand to the field.
    NumericIncrement(NumericOperand),
}

/// An integer or double increment operand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NumericOperand(FirestoreValue);

impl NumericOperand {
    /// Rejects operands that are not numbers.
    pub fn new(value: FirestoreValue) -> FirestoreResult<Self> {
        if !value.is_number() {
            return Err(invalid_argument(
                "Increment operand must be an integer or a double",
            ));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> &FirestoreValue {
        &self.0
    }
}

impl From<i64> for NumericOperand {
    fn from(value: i64) -> Self {
        Self(FirestoreValue::from_integer(value))
    }
}

impl From<f64> for NumericOperand {
    fn from(value: f64) -> Self {
        Self(FirestoreValue::from_double(value))
    }
}

impl TransformOperation {
    /// Builds a numeric increment, rejecting operands that are not numbers.
    pub fn increment(operand: FirestoreValue) -> FirestoreResult<Self> {
        NumericOperand::new(operand).map(TransformOperation::NumericIncrement)
    }

    pub fn array_union(elements: Vec<FirestoreValue>) -> Self {
        TransformOperation::ArrayUnion(elements)
    }

    pub fn array_remove(elements: Vec<FirestoreValue>) -> Self {
        TransformOperation::ArrayRemove(elements)
    }

    /// Computes the optimistic local result from the field's current value.
    pub fn apply_to_local_view(
        &self,
        previous: Option<&FirestoreValue>,
        local_write_time: Timestamp,
    ) -> FirestoreValue {
        match self {
            TransformOperation::ServerTimestamp => {
                FirestoreValue::server_timestamp(local_write_time, previous)
            }
            TransformOperation::ArrayUnion(elements) => array_union(previous, elements),
            TransformOperation::ArrayRemove(elements) => array_remove(previous, elements),
            TransformOperation::NumericIncrement(operand) => {
                let base = self
                    .compute_base_value(previous)
                    .unwrap_or_else(|| FirestoreValue::from_integer(0));
                increment(&base, operand)
            }
        }
    }

    /// Computes the committed result. Array transforms are recomputed from
    /// `previous` because the backend does not return their values; the other
    /// operations take the server's result, with a missing result read as null.
    pub fn apply_to_remote_document(
        &self,
        previous: Option<&FirestoreValue>,
        transform_result: Option<FirestoreValue>,
    ) -> FirestoreValue {
        match self {
            TransformOperation::ArrayUnion(elements) => array_union(previous, elements),
            TransformOperation::ArrayRemove(elements) => array_remove(previous, elements),
            TransformOperation::ServerTimestamp | TransformOperation::NumericIncrement(_) => {
                transform_result.unwrap_or_else(FirestoreValue::null)
            }
        }
    }

    /// The value the transform would start from if the field were rewritten
    /// idempotently. Only increments have one: the current number, or zero.
    pub fn compute_base_value(&self, previous: Option<&FirestoreValue>) -> Option<FirestoreValue> {
        match self {
            TransformOperation::NumericIncrement(_) => match previous {
                Some(value) if value.is_number() => Some(value.clone()),
                _ => Some(FirestoreValue::from_integer(0)),
            },
            _ => None,
        }
    }
}

fn array_elements(previous: Option<&FirestoreValue>) -> Vec<FirestoreValue> {
    previous
        .and_then(FirestoreValue::as_array)
        .map(|array| array.values().to_vec())
        .unwrap_or_default()
}

fn array_union(previous: Option<&FirestoreValue>, elements: &[FirestoreValue]) -> FirestoreValue {
    let mut values = array_elements(previous);
    for element in elements {
        if !values.contains(element) {
            values.push(element.clone());
        }
    }
    FirestoreValue::from_array(values)
}

fn array_remove(previous: Option<&FirestoreValue>, elements: &[FirestoreValue]) -> FirestoreValue {
    let mut values = array_elements(previous);
    values.retain(|value| !elements.contains(value));
    FirestoreValue::from_array(values)
}

fn increment(base: &FirestoreValue, operand: &NumericOperand) -> FirestoreValue {
    match (base.kind(), operand.value().kind()) {
        (ValueKind::Integer(base), ValueKind::Integer(operand)) => {
            FirestoreValue::from_integer(base.saturating_add(*operand))
        }
        (ValueKind::Integer(base), ValueKind::Double(operand)) => {
            FirestoreValue::from_double(*base as f64 + operand)
        }
        (ValueKind::Double(base), ValueKind::Integer(operand)) => {
            FirestoreValue::from_double(base + *operand as f64)
        }
        (ValueKind::Double(base), ValueKind::Double(operand)) => {
            FirestoreValue::from_double(base + operand)
        }
        // A non-numeric base counts as zero.
        _ => operand.value().clone(),
    }
}
